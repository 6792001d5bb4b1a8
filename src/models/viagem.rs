//! Viagens: ciclo de vida e regras de escrita guardada
//!
//! A máquina de status é a autoridade única sobre transições. Os campos de
//! hodômetro (km inicial/final) têm escrita guardada: uma vez cada, na ordem
//! certa, e pelo ator certo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::usuario::Papel;
use crate::utils::errors::AppError;

/// Status do ciclo de vida de uma viagem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusViagem {
    Pendente,
    Agendada,
    Andamento,
    Concluida,
    Cancelada,
    Recusada,
}

/// Status que bloqueiam veículo e motorista na checagem de conflito.
/// Pendente, Concluida, Cancelada e Recusada nunca bloqueiam.
pub const STATUS_BLOQUEANTES: [StatusViagem; 2] =
    [StatusViagem::Agendada, StatusViagem::Andamento];

impl StatusViagem {
    pub fn parse(raw: &str) -> Option<StatusViagem> {
        match raw {
            "Pendente" => Some(StatusViagem::Pendente),
            "Agendada" => Some(StatusViagem::Agendada),
            "Andamento" => Some(StatusViagem::Andamento),
            "Concluida" => Some(StatusViagem::Concluida),
            "Cancelada" => Some(StatusViagem::Cancelada),
            "Recusada" => Some(StatusViagem::Recusada),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusViagem::Pendente => "Pendente",
            StatusViagem::Agendada => "Agendada",
            StatusViagem::Andamento => "Andamento",
            StatusViagem::Concluida => "Concluida",
            StatusViagem::Cancelada => "Cancelada",
            StatusViagem::Recusada => "Recusada",
        }
    }

    /// Transições legais a partir deste status
    pub fn transicoes(&self) -> &'static [StatusViagem] {
        match self {
            StatusViagem::Pendente => &[
                StatusViagem::Agendada,
                StatusViagem::Recusada,
                StatusViagem::Cancelada,
            ],
            StatusViagem::Agendada => &[StatusViagem::Andamento, StatusViagem::Cancelada],
            StatusViagem::Andamento => &[StatusViagem::Concluida, StatusViagem::Cancelada],
            // Terminais
            StatusViagem::Concluida | StatusViagem::Cancelada | StatusViagem::Recusada => &[],
        }
    }

    pub fn pode_transicionar(&self, para: StatusViagem) -> bool {
        self.transicoes().contains(&para)
    }

    pub fn is_terminal(&self) -> bool {
        self.transicoes().is_empty()
    }

    pub fn bloqueia_recursos(&self) -> bool {
        STATUS_BLOQUEANTES.contains(self)
    }

    /// Alocação de recursos só é permitida antes da viagem começar
    pub fn permite_alocacao(&self) -> bool {
        matches!(self, StatusViagem::Pendente | StatusViagem::Agendada)
    }
}

/// Linha da tabela `viagens`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Viagem {
    pub id: i64,
    pub solicitante_id: i64,
    pub destino: String,
    pub finalidade: String,
    pub qtd_passageiros: i32,
    pub tipo_veiculo_desejado: Option<String>,
    pub data_saida: DateTime<Utc>,
    pub data_retorno: DateTime<Utc>,
    pub saida_real: Option<DateTime<Utc>>,
    pub retorno_real: Option<DateTime<Utc>>,
    pub veiculo_id: Option<i64>,
    pub motorista_id: Option<i64>,
    pub status: String,
    pub km_inicial: Option<i64>,
    pub km_final: Option<i64>,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
}

impl Viagem {
    /// Converte a coluna de status no enum fechado.
    /// Um valor desconhecido no banco é um erro interno, não do cliente.
    pub fn status_atual(&self) -> Result<StatusViagem, AppError> {
        StatusViagem::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("Status de viagem desconhecido no banco: '{}'", self.status))
        })
    }
}

/// Qual campo de hodômetro está sendo escrito
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoKm {
    Inicial,
    Final,
}

/// Valida um registro de hodômetro antes da escrita.
///
/// Caminho do motorista: precisa ser o motorista alocado na viagem; o km
/// final exige status Andamento ou Concluida. Caminho do gestor: sem
/// restrição de status (assimetria herdada do fluxo de operação, em que a
/// gerência corrige registros depois do fato).
pub fn validar_registro_km(
    viagem: &Viagem,
    tipo: TipoKm,
    valor: i64,
    usuario_id: i64,
    papel: Papel,
) -> Result<(), AppError> {
    if valor < 0 {
        return Err(AppError::Validation("O valor do hodômetro não pode ser negativo".to_string()));
    }

    let caminho_motorista = match papel {
        Papel::Gestor | Papel::Administrador => false,
        Papel::Motorista => {
            if viagem.motorista_id != Some(usuario_id) {
                return Err(AppError::Forbidden(
                    "Apenas o motorista alocado pode registrar o hodômetro desta viagem".to_string(),
                ));
            }
            true
        }
        Papel::Requisitante => {
            return Err(AppError::Forbidden(
                "Requisitantes não podem registrar hodômetro".to_string(),
            ));
        }
    };

    match tipo {
        TipoKm::Inicial => {
            if viagem.km_inicial.is_some() {
                return Err(AppError::Conflict("Km inicial já registrado".to_string()));
            }
        }
        TipoKm::Final => {
            let inicial = viagem.km_inicial.ok_or_else(|| {
                AppError::Conflict("Km inicial ainda não registrado".to_string())
            })?;
            if viagem.km_final.is_some() {
                return Err(AppError::Conflict("Km final já registrado".to_string()));
            }
            if valor < inicial {
                return Err(AppError::Validation(
                    "Km final deve ser maior ou igual ao km inicial".to_string(),
                ));
            }
            if caminho_motorista {
                let status = viagem.status_atual()?;
                if !matches!(status, StatusViagem::Andamento | StatusViagem::Concluida) {
                    return Err(AppError::Conflict(
                        "Km final só pode ser registrado com a viagem em andamento ou concluída"
                            .to_string(),
                    ));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn viagem_base() -> Viagem {
        Viagem {
            id: 1,
            solicitante_id: 10,
            destino: "Campus II".to_string(),
            finalidade: "Reunião".to_string(),
            qtd_passageiros: 2,
            tipo_veiculo_desejado: None,
            data_saida: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            data_retorno: Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap(),
            saida_real: None,
            retorno_real: None,
            veiculo_id: Some(7),
            motorista_id: Some(42),
            status: "Andamento".to_string(),
            km_inicial: None,
            km_final: None,
            observacoes: None,
            criado_em: Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn transicoes_legais() {
        assert!(StatusViagem::Pendente.pode_transicionar(StatusViagem::Agendada));
        assert!(StatusViagem::Pendente.pode_transicionar(StatusViagem::Recusada));
        assert!(StatusViagem::Agendada.pode_transicionar(StatusViagem::Andamento));
        assert!(StatusViagem::Andamento.pode_transicionar(StatusViagem::Concluida));
        // Cancelada é alcançável de qualquer status não terminal
        assert!(StatusViagem::Pendente.pode_transicionar(StatusViagem::Cancelada));
        assert!(StatusViagem::Agendada.pode_transicionar(StatusViagem::Cancelada));
        assert!(StatusViagem::Andamento.pode_transicionar(StatusViagem::Cancelada));
    }

    #[test]
    fn terminais_nao_transicionam() {
        assert!(StatusViagem::Concluida.is_terminal());
        assert!(StatusViagem::Cancelada.is_terminal());
        assert!(StatusViagem::Recusada.is_terminal());
        assert!(!StatusViagem::Pendente.is_terminal());
        assert!(!StatusViagem::Andamento.is_terminal());
        assert!(!StatusViagem::Concluida.pode_transicionar(StatusViagem::Andamento));
    }

    #[test]
    fn apenas_agendada_e_andamento_bloqueiam() {
        assert!(StatusViagem::Agendada.bloqueia_recursos());
        assert!(StatusViagem::Andamento.bloqueia_recursos());
        assert!(!StatusViagem::Pendente.bloqueia_recursos());
        assert!(!StatusViagem::Concluida.bloqueia_recursos());
        assert!(!StatusViagem::Cancelada.bloqueia_recursos());
        assert!(!StatusViagem::Recusada.bloqueia_recursos());
    }

    #[test]
    fn km_final_sem_inicial_conflita() {
        let viagem = viagem_base();
        let err =
            validar_registro_km(&viagem, TipoKm::Final, 50, 42, Papel::Motorista).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn km_inicial_escreve_uma_vez() {
        let mut viagem = viagem_base();
        assert!(validar_registro_km(&viagem, TipoKm::Inicial, 100, 42, Papel::Motorista).is_ok());
        viagem.km_inicial = Some(100);
        let err =
            validar_registro_km(&viagem, TipoKm::Inicial, 120, 42, Papel::Motorista).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn km_final_menor_que_inicial_falha() {
        let mut viagem = viagem_base();
        viagem.km_inicial = Some(100);
        let err =
            validar_registro_km(&viagem, TipoKm::Final, 90, 42, Papel::Motorista).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn km_final_sucede_uma_vez_depois_rejeita() {
        let mut viagem = viagem_base();
        viagem.km_inicial = Some(100);
        assert!(validar_registro_km(&viagem, TipoKm::Final, 150, 42, Papel::Motorista).is_ok());
        viagem.km_final = Some(150);
        let err =
            validar_registro_km(&viagem, TipoKm::Final, 160, 42, Papel::Motorista).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn motorista_nao_alocado_e_proibido() {
        let viagem = viagem_base();
        let err =
            validar_registro_km(&viagem, TipoKm::Inicial, 100, 99, Papel::Motorista).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn motorista_nao_fecha_km_fora_de_andamento() {
        let mut viagem = viagem_base();
        viagem.status = "Agendada".to_string();
        viagem.km_inicial = Some(100);
        let err =
            validar_registro_km(&viagem, TipoKm::Final, 150, 42, Papel::Motorista).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn gestor_fecha_km_em_qualquer_status() {
        // Assimetria documentada: o caminho da gerência não restringe status
        let mut viagem = viagem_base();
        viagem.status = "Agendada".to_string();
        viagem.km_inicial = Some(100);
        assert!(validar_registro_km(&viagem, TipoKm::Final, 150, 1, Papel::Gestor).is_ok());
    }

    #[test]
    fn requisitante_nao_registra_km() {
        let viagem = viagem_base();
        let err =
            validar_registro_km(&viagem, TipoKm::Inicial, 100, 10, Papel::Requisitante)
                .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
