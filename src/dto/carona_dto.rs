//! DTOs de carona

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::carona::Carona;

/// Um pedido individual dentro da criação em lote
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PedidoCarona {
    pub solicitante_id: i64,
    #[validate(length(min = 1, message = "O motivo é obrigatório"))]
    pub motivo: String,
}

/// Request de criação em lote: vários solicitantes para uma mesma viagem
#[derive(Debug, Deserialize, Validate)]
pub struct CriarCaronasRequest {
    pub viagem_id: i64,
    #[validate(length(min = 1, message = "Informe ao menos um pedido"))]
    pub pedidos: Vec<PedidoCarona>,
}

/// Request de transição de status de carona
#[derive(Debug, Deserialize)]
pub struct AtualizarStatusCaronaRequest {
    pub status: String,
}

/// Response de carona
#[derive(Debug, Serialize)]
pub struct CaronaResponse {
    pub id: i64,
    pub viagem_id: i64,
    pub solicitante_id: i64,
    pub motivo: String,
    pub status: String,
    pub criado_em: DateTime<Utc>,
}

impl From<Carona> for CaronaResponse {
    fn from(c: Carona) -> Self {
        Self {
            id: c.id,
            viagem_id: c.viagem_id,
            solicitante_id: c.solicitante_id,
            motivo: c.motivo,
            status: c.status,
            criado_em: c.criado_em,
        }
    }
}
