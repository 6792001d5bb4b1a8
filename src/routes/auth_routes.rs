use axum::{extract::State, routing::get, routing::post, Extension, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, UsuarioResponse};
use crate::models::auth::UsuarioAtual;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rotas públicas de autenticação
pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Rotas que exigem principal autenticado (montadas sob o middleware)
pub fn create_me_router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAtual>,
) -> Result<Json<UsuarioResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.me(&usuario).await?;
    Ok(Json(response))
}
