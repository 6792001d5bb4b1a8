//! DTOs de viagem
//!
//! Os structs de atualização são listas fechadas de campos graváveis.
//! Nenhuma rota aceita colunas arbitrárias do cliente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::viagem::{TipoKm, Viagem};

/// Request para criar uma viagem (status nasce Pendente)
#[derive(Debug, Deserialize, Validate)]
pub struct CriarViagemRequest {
    #[validate(length(min = 1, message = "O destino é obrigatório"))]
    pub destino: String,
    #[validate(length(min = 1, message = "A finalidade é obrigatória"))]
    pub finalidade: String,
    #[validate(range(min = 1, message = "A viagem precisa de ao menos um passageiro"))]
    pub qtd_passageiros: i32,
    pub tipo_veiculo_desejado: Option<String>,
    pub data_saida: DateTime<Utc>,
    pub data_retorno: DateTime<Utc>,
    pub observacoes: Option<String>,
}

/// Request para alocar recursos a uma viagem.
/// `None` mantém o campo como está; a checagem de conflito roda para cada
/// recurso presente.
#[derive(Debug, Deserialize)]
pub struct AlocarRecursosRequest {
    pub veiculo_id: Option<i64>,
    pub motorista_id: Option<i64>,
}

/// Query da pré-checagem de disponibilidade (alocação ainda não gravada)
#[derive(Debug, Deserialize)]
pub struct DisponibilidadeQuery {
    pub veiculo_id: Option<i64>,
    pub motorista_id: Option<i64>,
}

/// Resultado da pré-checagem: `None` quando o recurso não foi consultado
#[derive(Debug, Serialize)]
pub struct DisponibilidadeResponse {
    pub veiculo_conflita: Option<bool>,
    pub motorista_conflita: Option<bool>,
}

/// Request de transição de status
#[derive(Debug, Deserialize)]
pub struct AtualizarStatusRequest {
    pub status: String,
}

/// Request de registro de hodômetro
#[derive(Debug, Deserialize)]
pub struct RegistrarKmRequest {
    pub tipo: TipoKm,
    pub valor: i64,
}

/// Response de viagem
#[derive(Debug, Serialize)]
pub struct ViagemResponse {
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

impl From<Viagem> for ViagemResponse {
    fn from(v: Viagem) -> Self {
        Self {
            id: v.id,
            solicitante_id: v.solicitante_id,
            destino: v.destino,
            finalidade: v.finalidade,
            qtd_passageiros: v.qtd_passageiros,
            tipo_veiculo_desejado: v.tipo_veiculo_desejado,
            data_saida: v.data_saida,
            data_retorno: v.data_retorno,
            saida_real: v.saida_real,
            retorno_real: v.retorno_real,
            veiculo_id: v.veiculo_id,
            motorista_id: v.motorista_id,
            status: v.status,
            km_inicial: v.km_inicial,
            km_final: v.km_final,
            observacoes: v.observacoes,
            criado_em: v.criado_em,
        }
    }
}
