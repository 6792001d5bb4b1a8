//! Controller de caronas

use sqlx::PgPool;
use validator::Validate;

use crate::dto::carona_dto::{AtualizarStatusCaronaRequest, CaronaResponse, CriarCaronasRequest};
use crate::dto::respostas::ApiResponse;
use crate::middleware::auth::exigir_gestao;
use crate::models::auth::UsuarioAtual;
use crate::models::carona::StatusCarona;
use crate::repositories::carona_repository::CaronaRepository;
use crate::repositories::viagem_repository::ViagemRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct CaronaController {
    repository: CaronaRepository,
    viagens: ViagemRepository,
}

impl CaronaController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CaronaRepository::new(pool.clone()),
            viagens: ViagemRepository::new(pool),
        }
    }

    /// Criação em lote: vários solicitantes pedem carona na mesma viagem.
    /// Todos os pedidos nascem Pendente.
    pub async fn criar(
        &self,
        request: CriarCaronasRequest,
    ) -> Result<ApiResponse<Vec<CaronaResponse>>, AppError> {
        request.validate()?;
        for pedido in &request.pedidos {
            pedido.validate()?;
        }

        // A viagem precisa existir antes de aceitar pedidos
        self.viagens
            .find_by_id(request.viagem_id)
            .await?
            .ok_or_else(|| not_found_error("Viagem", request.viagem_id))?;

        let pedidos: Vec<(i64, String)> = request
            .pedidos
            .into_iter()
            .map(|p| (p.solicitante_id, p.motivo))
            .collect();

        let caronas = self.repository.criar_lote(request.viagem_id, &pedidos).await?;

        Ok(ApiResponse::success_with_message(
            caronas.into_iter().map(Into::into).collect(),
            "Pedidos de carona criados com sucesso".to_string(),
        ))
    }

    pub async fn listar_por_viagem(&self, viagem_id: i64) -> Result<Vec<CaronaResponse>, AppError> {
        let caronas = self.repository.list_by_viagem(viagem_id).await?;
        Ok(caronas.into_iter().map(Into::into).collect())
    }

    /// Transição de status pela gestão. Aprovado/Reprovado são terminais:
    /// não há caminho de volta a Pendente.
    pub async fn transicionar_status(
        &self,
        usuario: &UsuarioAtual,
        id: i64,
        request: AtualizarStatusCaronaRequest,
    ) -> Result<ApiResponse<CaronaResponse>, AppError> {
        exigir_gestao(usuario)?;

        let carona = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Carona", id))?;

        let atual = StatusCarona::parse(&carona.status).ok_or_else(|| {
            AppError::Internal(format!("Status de carona desconhecido no banco: '{}'", carona.status))
        })?;

        let novo = StatusCarona::parse(&request.status).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "Status '{}' não existe; valores válidos: [Pendente, Aprovado, Reprovado]",
                request.status
            ))
        })?;

        if !atual.pode_transicionar(novo) {
            return Err(AppError::InvalidTransition(format!(
                "Transição de '{}' para '{}' não é permitida",
                carona.status,
                novo.as_str()
            )));
        }

        // Compare-and-set: dois gestores decidindo a mesma carona não
        // gravam ambos
        match self.repository.atualizar_status(id, atual, novo).await? {
            Some(atualizada) => Ok(ApiResponse::success_with_message(
                atualizada.into(),
                "Status da carona atualizado com sucesso".to_string(),
            )),
            None => match self.repository.find_by_id(id).await? {
                Some(_) => Err(AppError::Conflict(
                    "Carona já decidida por outro gestor; recarregue".to_string(),
                )),
                None => Err(not_found_error("Carona", id)),
            },
        }
    }
}
