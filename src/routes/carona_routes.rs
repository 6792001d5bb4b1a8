use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::carona_controller::CaronaController;
use crate::dto::carona_dto::{AtualizarStatusCaronaRequest, CaronaResponse, CriarCaronasRequest};
use crate::dto::respostas::ApiResponse;
use crate::models::auth::UsuarioAtual;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_carona_router() -> Router<AppState> {
    Router::new()
        .route("/", post(criar_caronas))
        .route("/viagem/:viagem_id", get(listar_por_viagem))
        .route("/:id/status", patch(atualizar_status))
}

async fn criar_caronas(
    State(state): State<AppState>,
    Json(request): Json<CriarCaronasRequest>,
) -> Result<Json<ApiResponse<Vec<CaronaResponse>>>, AppError> {
    let controller = CaronaController::new(state.pool.clone());
    let response = controller.criar(request).await?;
    Ok(Json(response))
}

async fn listar_por_viagem(
    State(state): State<AppState>,
    Path(viagem_id): Path<i64>,
) -> Result<Json<Vec<CaronaResponse>>, AppError> {
    let controller = CaronaController::new(state.pool.clone());
    let response = controller.listar_por_viagem(viagem_id).await?;
    Ok(Json(response))
}

async fn atualizar_status(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
    Path(id): Path<i64>,
    Json(request): Json<AtualizarStatusCaronaRequest>,
) -> Result<Json<ApiResponse<CaronaResponse>>, AppError> {
    let controller = CaronaController::new(state.pool.clone());
    let response = controller.transicionar_status(&usuario, id, request).await?;
    Ok(Json(response))
}
