//! DTOs de autenticação

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória"))]
    pub senha: String,
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: UsuarioResponse,
}

/// Dados públicos do usuário autenticado
#[derive(Debug, Serialize)]
pub struct UsuarioResponse {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub papel: String,
    pub ativo: bool,
}
