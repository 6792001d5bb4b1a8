//! Usuários e papéis
//!
//! O papel é um enum fechado. Toda grafia vinda de fora (banco, token,
//! payload) passa por `Papel::normalizar` na fronteira de identidade;
//! nenhum handler compara strings de papel diretamente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Papéis reconhecidos pelo sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Papel {
    Requisitante,
    Motorista,
    Gestor,
    Administrador,
}

impl Papel {
    /// Normaliza uma grafia externa em um papel fechado.
    ///
    /// Grafias históricas do sistema antigo são aceitas aqui e em nenhum
    /// outro lugar.
    pub fn normalizar(raw: &str) -> Option<Papel> {
        match raw.trim().to_lowercase().as_str() {
            "requisitante" | "solicitante" => Some(Papel::Requisitante),
            "motorista" | "condutor" => Some(Papel::Motorista),
            "gestor" | "gestor de frota" => Some(Papel::Gestor),
            "administrador" | "admin" => Some(Papel::Administrador),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Papel::Requisitante => "Requisitante",
            Papel::Motorista => "Motorista",
            Papel::Gestor => "Gestor",
            Papel::Administrador => "Administrador",
        }
    }

    /// Gestores e administradores formam o público de suporte/gerência,
    /// tanto no chat quanto nas operações de viagem.
    pub fn is_suporte(&self) -> bool {
        matches!(self, Papel::Gestor | Papel::Administrador)
    }
}

/// Linha da tabela `usuarios`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Usuario {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
    pub papel: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizar_aceita_grafias_historicas() {
        assert_eq!(Papel::normalizar("Gestor"), Some(Papel::Gestor));
        assert_eq!(Papel::normalizar("  ADMIN "), Some(Papel::Administrador));
        assert_eq!(Papel::normalizar("condutor"), Some(Papel::Motorista));
        assert_eq!(Papel::normalizar("solicitante"), Some(Papel::Requisitante));
        assert_eq!(Papel::normalizar("estagiario"), None);
    }

    #[test]
    fn suporte_cobre_gestao_e_administracao() {
        assert!(Papel::Gestor.is_suporte());
        assert!(Papel::Administrador.is_suporte());
        assert!(!Papel::Motorista.is_suporte());
        assert!(!Papel::Requisitante.is_suporte());
    }
}
