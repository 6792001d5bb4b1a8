//! Estado compartilhado da aplicação
//!
//! Este módulo define o estado que atravessa o router do Axum: pool do
//! banco, configuração de ambiente e o broker do chat.

use std::sync::Arc;

use sqlx::PgPool;

use crate::chat::broker::ChatBroker;
use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub broker: Arc<ChatBroker>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            broker: Arc::new(ChatBroker::new()),
        }
    }
}
