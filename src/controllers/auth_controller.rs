//! Controller de autenticação

use sqlx::PgPool;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, UsuarioResponse};
use crate::models::auth::UsuarioAtual;
use crate::services::auth_service::AuthService;
use crate::utils::errors::AppError;

pub struct AuthController {
    service: AuthService,
}

impl AuthController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            service: AuthService::new(pool, config),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let (token, usuario) = self.service.login(&request.email, &request.senha).await?;

        Ok(LoginResponse {
            token,
            usuario: UsuarioResponse {
                id: usuario.id,
                nome: usuario.nome,
                email: usuario.email,
                papel: usuario.papel,
                ativo: usuario.ativo,
            },
        })
    }

    pub async fn me(&self, usuario: &UsuarioAtual) -> Result<UsuarioResponse, AppError> {
        let atual = self.service.usuario_atual(usuario.id).await?;

        Ok(UsuarioResponse {
            id: atual.id,
            nome: atual.nome,
            email: atual.email,
            papel: atual.papel,
            ativo: atual.ativo,
        })
    }
}
