use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::viagem_controller::ViagemController;
use crate::dto::respostas::ApiResponse;
use crate::dto::viagem_dto::{
    AlocarRecursosRequest, AtualizarStatusRequest, CriarViagemRequest, DisponibilidadeQuery,
    DisponibilidadeResponse, RegistrarKmRequest, ViagemResponse,
};
use crate::models::auth::UsuarioAtual;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_viagem_router() -> Router<AppState> {
    Router::new()
        .route("/", post(criar_viagem))
        .route("/", get(listar_viagens))
        .route("/:id", get(obter_viagem))
        .route("/:id", delete(excluir_viagem))
        .route("/:id/alocacao", patch(alocar_recursos))
        .route("/:id/disponibilidade", get(verificar_disponibilidade))
        .route("/:id/status", patch(atualizar_status))
        .route("/:id/km", patch(registrar_km))
}

async fn criar_viagem(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Json(request): Json<CriarViagemRequest>,
) -> Result<Json<ApiResponse<ViagemResponse>>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    let response = controller.criar(&usuario, request).await?;
    Ok(Json(response))
}

async fn listar_viagens(
    State(state): State<AppState>,
) -> Result<Json<Vec<ViagemResponse>>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    let response = controller.listar().await?;
    Ok(Json(response))
}

async fn obter_viagem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ViagemResponse>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    let response = controller.obter(id).await?;
    Ok(Json(response))
}

async fn excluir_viagem(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    controller.excluir(&usuario, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Viagem excluída com sucesso"
    })))
}

async fn alocar_recursos(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
    Json(request): Json<AlocarRecursosRequest>,
) -> Result<Json<ApiResponse<ViagemResponse>>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    let response = controller.alocar(&usuario, id, request).await?;
    Ok(Json(response))
}

async fn verificar_disponibilidade(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
    Query(query): Query<DisponibilidadeQuery>,
) -> Result<Json<ApiResponse<DisponibilidadeResponse>>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    let response = controller.verificar_disponibilidade(&usuario, id, query).await?;
    Ok(Json(response))
}

async fn atualizar_status(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
    Json(request): Json<AtualizarStatusRequest>,
) -> Result<Json<ApiResponse<ViagemResponse>>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    let response = controller.transicionar_status(&usuario, id, request).await?;
    Ok(Json(response))
}

async fn registrar_km(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
    Json(request): Json<RegistrarKmRequest>,
) -> Result<Json<ApiResponse<ViagemResponse>>, AppError> {
    let controller = ViagemController::new(state.pool.clone());
    let response = controller.registrar_km(&usuario, id, request).await?;
    Ok(Json(response))
}
