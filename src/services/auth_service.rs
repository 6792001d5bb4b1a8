//! Serviço de autenticação
//!
//! Realiza o contrato do provedor de identidade: dado um token, devolve
//! `{userId, papel, ativo}` ou rejeita. A normalização do papel em enum
//! fechado acontece aqui, na fronteira — os handlers nunca veem a string.

use bcrypt::verify;
use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::models::auth::UsuarioAtual;
use crate::models::usuario::{Papel, Usuario};
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::AppError;

pub struct AuthService {
    jwt: JwtService,
    usuarios: UsuarioRepository,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            jwt: JwtService::new(&config.jwt_secret, config.jwt_expiration_horas),
            usuarios: UsuarioRepository::new(pool),
        }
    }

    /// Login com e-mail e senha; usuários inativos são recusados
    pub async fn login(&self, email: &str, senha: &str) -> Result<(String, Usuario), AppError> {
        let usuario = self
            .usuarios
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciais inválidas".to_string()))?;

        let senha_confere = verify(senha, &usuario.senha_hash)
            .map_err(|e| AppError::Hash(format!("Erro ao verificar senha: {}", e)))?;
        if !senha_confere {
            return Err(AppError::Unauthorized("Credenciais inválidas".to_string()));
        }

        if !usuario.ativo {
            return Err(AppError::Unauthorized("Usuário inativo".to_string()));
        }

        let token = self.jwt.gerar_token(&usuario)?;
        Ok((token, usuario))
    }

    /// Identifica o principal a partir do token
    pub fn identificar(&self, token: &str) -> Result<UsuarioAtual, AppError> {
        let claims = self.jwt.validar_token(token)?;

        if !claims.ativo {
            return Err(AppError::Unauthorized("Usuário inativo".to_string()));
        }

        let papel = Papel::normalizar(&claims.papel)
            .ok_or_else(|| AppError::Unauthorized(format!("Papel desconhecido: '{}'", claims.papel)))?;

        Ok(UsuarioAtual {
            id: claims.sub,
            nome: claims.nome,
            papel,
        })
    }

    /// Busca os dados atuais do usuário autenticado
    pub async fn usuario_atual(&self, id: i64) -> Result<Usuario, AppError> {
        self.usuarios
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))
    }
}
