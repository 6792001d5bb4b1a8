//! Mensagens de chat (append-only)

use chrono::{DateTime, Utc};

/// Linha da tabela `chat_mensagens`.
/// Mensagens nunca são alteradas ou apagadas pela aplicação.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatMensagem {
    pub id: i64,
    pub usuario_id: Option<i64>,
    pub nome: String,
    pub texto: String,
    pub suporte: bool,
    pub criado_em: DateTime<Utc>,
}
