//! Controller de viagens
//!
//! Orquestra as regras de autorização e o ciclo de vida: criação pelo
//! requisitante, alocação e transição de status pela gestão, hodômetro
//! pelo motorista alocado (ou pela gestão).

use sqlx::PgPool;
use validator::Validate;

use crate::dto::respostas::ApiResponse;
use crate::dto::viagem_dto::{
    AlocarRecursosRequest, AtualizarStatusRequest, CriarViagemRequest, DisponibilidadeQuery,
    DisponibilidadeResponse, RegistrarKmRequest, ViagemResponse,
};
use crate::middleware::auth::exigir_gestao;
use crate::models::auth::UsuarioAtual;
use crate::models::viagem::{validar_registro_km, StatusViagem};
use crate::repositories::viagem_repository::{Recurso, ViagemRepository};
use crate::services::conflito::Janela;
use crate::utils::errors::{not_found_error, AppError};

pub struct ViagemController {
    repository: ViagemRepository,
}

impl ViagemController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ViagemRepository::new(pool),
        }
    }

    pub async fn criar(
        &self,
        usuario: &UsuarioAtual,
        request: CriarViagemRequest,
    ) -> Result<ApiResponse<ViagemResponse>, AppError> {
        request.validate()?;
        // Ordem das datas validada antes de qualquer consulta
        Janela::nova(request.data_saida, request.data_retorno)?;

        let viagem = self
            .repository
            .create(
                usuario.id,
                request.destino,
                request.finalidade,
                request.qtd_passageiros,
                request.tipo_veiculo_desejado,
                request.data_saida,
                request.data_retorno,
                request.observacoes,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            viagem.into(),
            "Viagem criada com sucesso".to_string(),
        ))
    }

    pub async fn obter(&self, id: i64) -> Result<ViagemResponse, AppError> {
        let viagem = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Viagem", id))?;

        Ok(viagem.into())
    }

    pub async fn listar(&self) -> Result<Vec<ViagemResponse>, AppError> {
        let viagens = self.repository.list().await?;
        Ok(viagens.into_iter().map(Into::into).collect())
    }

    pub async fn excluir(&self, usuario: &UsuarioAtual, id: i64) -> Result<(), AppError> {
        exigir_gestao(usuario)?;
        self.repository.delete(id).await
    }

    /// Aloca veículo e/ou motorista. A checagem de conflito e a escrita
    /// rodam juntas na transação do repositório; qualquer conflito aborta
    /// a alocação inteira.
    pub async fn alocar(
        &self,
        usuario: &UsuarioAtual,
        id: i64,
        request: AlocarRecursosRequest,
    ) -> Result<ApiResponse<ViagemResponse>, AppError> {
        exigir_gestao(usuario)?;

        if request.veiculo_id.is_none() && request.motorista_id.is_none() {
            return Err(AppError::Validation(
                "Informe um veículo e/ou um motorista para alocar".to_string(),
            ));
        }

        let viagem = self
            .repository
            .alocar(id, request.veiculo_id, request.motorista_id)
            .await?;

        Ok(ApiResponse::success_with_message(
            viagem.into(),
            "Recursos alocados com sucesso".to_string(),
        ))
    }

    /// Pré-checagem de disponibilidade para a janela da viagem. Só informa;
    /// a checagem que vale é a da transação de alocação.
    pub async fn verificar_disponibilidade(
        &self,
        usuario: &UsuarioAtual,
        id: i64,
        query: DisponibilidadeQuery,
    ) -> Result<ApiResponse<DisponibilidadeResponse>, AppError> {
        exigir_gestao(usuario)?;

        let viagem = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Viagem", id))?;
        let janela = Janela::nova(viagem.data_saida, viagem.data_retorno)?;

        let veiculo_conflita = match query.veiculo_id {
            Some(veiculo_id) => Some(
                self.repository
                    .existe_conflito(Recurso::Veiculo, veiculo_id, &janela, id)
                    .await?,
            ),
            None => None,
        };
        let motorista_conflita = match query.motorista_id {
            Some(motorista_id) => Some(
                self.repository
                    .existe_conflito(Recurso::Motorista, motorista_id, &janela, id)
                    .await?,
            ),
            None => None,
        };

        Ok(ApiResponse::success(DisponibilidadeResponse {
            veiculo_conflita,
            motorista_conflita,
        }))
    }

    /// Transição de status, restrita à gestão. Alvo desconhecido ou fora
    /// do conjunto permitido responde com a lista de transições legais.
    pub async fn transicionar_status(
        &self,
        usuario: &UsuarioAtual,
        id: i64,
        request: AtualizarStatusRequest,
    ) -> Result<ApiResponse<ViagemResponse>, AppError> {
        exigir_gestao(usuario)?;

        let viagem = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Viagem", id))?;

        let atual = viagem.status_atual()?;
        if atual.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Viagem em status terminal '{}' não admite transições",
                viagem.status
            )));
        }

        let permitidas = atual
            .transicoes()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let novo = StatusViagem::parse(&request.status).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "Status '{}' não existe; a partir de '{}' são permitidos: [{}]",
                request.status, viagem.status, permitidas
            ))
        })?;

        if !atual.pode_transicionar(novo) {
            return Err(AppError::InvalidTransition(format!(
                "Transição de '{}' para '{}' não é permitida; permitidas: [{}]",
                viagem.status,
                novo.as_str(),
                permitidas
            )));
        }

        // O UPDATE é compare-and-set: se outro gestor transicionou primeiro,
        // a checagem acima fica obsoleta e nada é gravado
        match self.repository.atualizar_status(id, atual, novo).await? {
            Some(atualizada) => Ok(ApiResponse::success_with_message(
                atualizada.into(),
                "Status atualizado com sucesso".to_string(),
            )),
            None => match self.repository.find_by_id(id).await? {
                Some(_) => Err(AppError::Conflict(
                    "Transição de status concorrente; recarregue e tente novamente".to_string(),
                )),
                None => Err(not_found_error("Viagem", id)),
            },
        }
    }

    pub async fn registrar_km(
        &self,
        usuario: &UsuarioAtual,
        id: i64,
        request: RegistrarKmRequest,
    ) -> Result<ApiResponse<ViagemResponse>, AppError> {
        let viagem = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Viagem", id))?;

        validar_registro_km(&viagem, request.tipo, request.valor, usuario.id, usuario.papel)?;

        match self
            .repository
            .registrar_km(id, request.tipo, request.valor)
            .await?
        {
            Some(atualizada) => Ok(ApiResponse::success_with_message(
                atualizada.into(),
                "Hodômetro registrado com sucesso".to_string(),
            )),
            // O UPDATE condicional não encontrou a linha no estado validado:
            // ou a viagem sumiu, ou outro registro chegou primeiro
            None => match self.repository.find_by_id(id).await? {
                Some(_) => Err(AppError::Conflict(
                    "Registro de hodômetro concorrente; recarregue e tente novamente".to_string(),
                )),
                None => Err(not_found_error("Viagem", id)),
            },
        }
    }
}
