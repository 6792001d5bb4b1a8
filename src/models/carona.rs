//! Caronas: pedidos de participação em uma viagem existente

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status de um pedido de carona.
/// Aprovado e Reprovado são terminais: não há caminho de volta a Pendente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCarona {
    Pendente,
    Aprovado,
    Reprovado,
}

impl StatusCarona {
    pub fn parse(raw: &str) -> Option<StatusCarona> {
        match raw {
            "Pendente" => Some(StatusCarona::Pendente),
            "Aprovado" => Some(StatusCarona::Aprovado),
            "Reprovado" => Some(StatusCarona::Reprovado),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCarona::Pendente => "Pendente",
            StatusCarona::Aprovado => "Aprovado",
            StatusCarona::Reprovado => "Reprovado",
        }
    }

    pub fn pode_transicionar(&self, para: StatusCarona) -> bool {
        matches!(
            (self, para),
            (StatusCarona::Pendente, StatusCarona::Aprovado)
                | (StatusCarona::Pendente, StatusCarona::Reprovado)
        )
    }
}

/// Linha da tabela `caronas`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Carona {
    pub id: i64,
    pub viagem_id: i64,
    pub solicitante_id: i64,
    pub motivo: String,
    pub status: String,
    pub criado_em: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transicao_de_carona_e_unidirecional() {
        assert!(StatusCarona::Pendente.pode_transicionar(StatusCarona::Aprovado));
        assert!(StatusCarona::Pendente.pode_transicionar(StatusCarona::Reprovado));
        assert!(!StatusCarona::Aprovado.pode_transicionar(StatusCarona::Pendente));
        assert!(!StatusCarona::Reprovado.pode_transicionar(StatusCarona::Aprovado));
    }
}
