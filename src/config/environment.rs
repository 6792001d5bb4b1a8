//! Configuração de variáveis de ambiente
//!
//! Este módulo concentra a leitura das variáveis de ambiente usadas
//! pelo servidor. Valores ausentes caem em padrões de desenvolvimento.

use std::env;

/// Configuração do ambiente
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration_horas: i64,
    pub cors_origins: Vec<String>,
    pub chat_history_limit: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "troque-este-segredo-em-producao".to_string()),
            jwt_expiration_horas: env::var("JWT_EXPIRATION_HORAS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HORAS must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            chat_history_limit: env::var("CHAT_HISTORY_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .expect("CHAT_HISTORY_LIMIT must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verifica se estamos em modo desenvolvimento
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verifica se estamos em modo produção
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
