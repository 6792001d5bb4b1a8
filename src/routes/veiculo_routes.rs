use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use crate::controllers::veiculo_controller::VeiculoController;
use crate::dto::respostas::ApiResponse;
use crate::dto::veiculo_dto::{AtualizarVeiculoRequest, CriarVeiculoRequest, VeiculoResponse};
use crate::models::auth::UsuarioAtual;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_veiculo_router() -> Router<AppState> {
    Router::new()
        .route("/", post(criar_veiculo))
        .route("/", get(listar_veiculos))
        .route("/:id", get(obter_veiculo))
        .route("/:id", put(atualizar_veiculo))
        .route("/:id", delete(excluir_veiculo))
}

async fn criar_veiculo(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Json(request): Json<CriarVeiculoRequest>,
) -> Result<Json<ApiResponse<VeiculoResponse>>, AppError> {
    let controller = VeiculoController::new(state.pool.clone());
    let response = controller.criar(&usuario, request).await?;
    Ok(Json(response))
}

async fn listar_veiculos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VeiculoResponse>>, AppError> {
    let controller = VeiculoController::new(state.pool.clone());
    let response = controller.listar().await?;
    Ok(Json(response))
}

async fn obter_veiculo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VeiculoResponse>, AppError> {
    let controller = VeiculoController::new(state.pool.clone());
    let response = controller.obter(id).await?;
    Ok(Json(response))
}

async fn atualizar_veiculo(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
    Json(request): Json<AtualizarVeiculoRequest>,
) -> Result<Json<ApiResponse<VeiculoResponse>>, AppError> {
    let controller = VeiculoController::new(state.pool.clone());
    let response = controller.atualizar(&usuario, id, request).await?;
    Ok(Json(response))
}

async fn excluir_veiculo(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<VeiculoResponse>>, AppError> {
    let controller = VeiculoController::new(state.pool.clone());
    let response = controller.excluir(&usuario, id).await?;
    Ok(Json(response))
}
