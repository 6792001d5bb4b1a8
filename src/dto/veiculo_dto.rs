//! DTOs de veículo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::veiculo::Veiculo;

/// Request para cadastrar um veículo
#[derive(Debug, Deserialize, Validate)]
pub struct CriarVeiculoRequest {
    #[validate(length(min = 1, message = "A placa é obrigatória"))]
    pub placa: String,
    pub modelo: Option<String>,
    pub tipo: Option<String>,
    pub responsavel_id: Option<i64>,
}

/// Request para atualizar um veículo — lista fechada de campos graváveis
#[derive(Debug, Deserialize)]
pub struct AtualizarVeiculoRequest {
    pub placa: Option<String>,
    pub modelo: Option<String>,
    pub tipo: Option<String>,
    pub status: Option<String>,
    pub responsavel_id: Option<i64>,
}

/// Response de veículo
#[derive(Debug, Serialize)]
pub struct VeiculoResponse {
    pub id: i64,
    pub placa: String,
    pub modelo: Option<String>,
    pub tipo: Option<String>,
    pub status: String,
    pub responsavel_id: Option<i64>,
    pub criado_em: DateTime<Utc>,
}

impl From<Veiculo> for VeiculoResponse {
    fn from(v: Veiculo) -> Self {
        Self {
            id: v.id,
            placa: v.placa,
            modelo: v.modelo,
            tipo: v.tipo,
            status: v.status,
            responsavel_id: v.responsavel_id,
            criado_em: v.criado_em,
        }
    }
}
