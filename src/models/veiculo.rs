//! Veículos da frota

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status operacional do veículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusVeiculo {
    Disponivel,
    EmUso,
    Manutencao,
    Inativo,
}

impl StatusVeiculo {
    pub fn parse(raw: &str) -> Option<StatusVeiculo> {
        match raw {
            "Disponivel" => Some(StatusVeiculo::Disponivel),
            "EmUso" => Some(StatusVeiculo::EmUso),
            "Manutencao" => Some(StatusVeiculo::Manutencao),
            "Inativo" => Some(StatusVeiculo::Inativo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusVeiculo::Disponivel => "Disponivel",
            StatusVeiculo::EmUso => "EmUso",
            StatusVeiculo::Manutencao => "Manutencao",
            StatusVeiculo::Inativo => "Inativo",
        }
    }
}

/// Linha da tabela `veiculos`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Veiculo {
    pub id: i64,
    pub placa: String,
    pub modelo: Option<String>,
    pub tipo: Option<String>,
    pub status: String,
    pub responsavel_id: Option<i64>,
    pub criado_em: DateTime<Utc>,
}
