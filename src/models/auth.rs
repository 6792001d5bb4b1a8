//! Modelos de autenticação
//!
//! O provedor de identidade entrega `{userId, papel, ativo}` a partir do
//! token. O papel chega como string e é normalizado no enum fechado na
//! própria fronteira (middleware), nunca nos handlers.

use serde::{Deserialize, Serialize};

use crate::models::usuario::Papel;

/// Claims carregadas no JWT (HS256)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Id do usuário
    pub sub: i64,
    pub nome: String,
    pub papel: String,
    pub ativo: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Principal autenticado, inserido como extensão da requisição
#[derive(Debug, Clone)]
pub struct UsuarioAtual {
    pub id: i64,
    pub nome: String,
    pub papel: Papel,
}
