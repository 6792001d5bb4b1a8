//! Middleware de autenticação
//!
//! Extrai o bearer token, valida via AuthService e insere o principal
//! (`UsuarioAtual`) como extensão da requisição. Rotas protegidas recebem
//! o principal já com o papel normalizado.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::models::auth::UsuarioAtual;
use crate::services::auth_service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware que exige autenticação
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extrair_bearer(&headers)?;

    let auth = AuthService::new(state.pool.clone(), &state.config);
    let usuario = auth.identificar(token)?;

    request.extensions_mut().insert(usuario);
    Ok(next.run(request).await)
}

fn extrair_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token ausente".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Formato de autorização inválido".to_string()))
}

/// Guarda de papel: apenas gestão (Gestor/Administrador)
pub fn exigir_gestao(usuario: &UsuarioAtual) -> Result<(), AppError> {
    if usuario.papel.is_suporte() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Apenas gestores e administradores podem executar esta operação".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usuario::Papel;

    fn usuario(papel: Papel) -> UsuarioAtual {
        UsuarioAtual {
            id: 1,
            nome: "Teste".to_string(),
            papel,
        }
    }

    #[test]
    fn gestao_cobre_gestor_e_administrador() {
        assert!(exigir_gestao(&usuario(Papel::Gestor)).is_ok());
        assert!(exigir_gestao(&usuario(Papel::Administrador)).is_ok());
        assert!(exigir_gestao(&usuario(Papel::Motorista)).is_err());
        assert!(exigir_gestao(&usuario(Papel::Requisitante)).is_err());
    }

    #[test]
    fn bearer_malformado_e_rejeitado() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Token abc".parse().unwrap());
        assert!(extrair_bearer(&headers).is_err());

        headers.insert("Authorization", "Bearer abc".parse().unwrap());
        assert_eq!(extrair_bearer(&headers).unwrap(), "abc");
    }
}
