//! Serviço JWT (HS256)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::JwtClaims;
use crate::models::usuario::Usuario;
use crate::utils::errors::AppError;

pub struct JwtService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    duracao: Duration,
}

impl JwtService {
    pub fn new(secret: &str, expiracao_horas: i64) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            duracao: Duration::hours(expiracao_horas),
        }
    }

    /// Gera o token de acesso de um usuário
    pub fn gerar_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        let agora = Utc::now();
        let claims = JwtClaims {
            sub: usuario.id,
            nome: usuario.nome.clone(),
            papel: usuario.papel.clone(),
            ativo: usuario.ativo,
            exp: (agora + self.duracao).timestamp(),
            iat: agora.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Jwt(format!("Erro ao gerar token: {}", e)))
    }

    /// Valida e decodifica um token
    pub fn validar_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let validation = Validation::new(self.algorithm);
        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|dados| dados.claims)
            .map_err(|_| AppError::Jwt("Token inválido ou expirado".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn usuario_teste() -> Usuario {
        Usuario {
            id: 42,
            nome: "Ana".to_string(),
            email: "ana@exemplo.com".to_string(),
            senha_hash: String::new(),
            papel: "Gestor".to_string(),
            ativo: true,
            criado_em: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn token_gerado_e_valido() {
        let service = JwtService::new("segredo-de-teste", 1);
        let token = service.gerar_token(&usuario_teste()).unwrap();
        let claims = service.validar_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.papel, "Gestor");
        assert!(claims.ativo);
    }

    #[test]
    fn token_com_segredo_errado_e_rejeitado() {
        let service = JwtService::new("segredo-a", 1);
        let token = service.gerar_token(&usuario_teste()).unwrap();
        let outro = JwtService::new("segredo-b", 1);
        assert!(outro.validar_token(&token).is_err());
    }
}
