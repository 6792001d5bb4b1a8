//! Controller de veículos

use sqlx::PgPool;
use validator::Validate;

use crate::dto::respostas::ApiResponse;
use crate::dto::veiculo_dto::{AtualizarVeiculoRequest, CriarVeiculoRequest, VeiculoResponse};
use crate::middleware::auth::exigir_gestao;
use crate::models::auth::UsuarioAtual;
use crate::models::veiculo::StatusVeiculo;
use crate::repositories::veiculo_repository::VeiculoRepository;
use crate::utils::errors::{conflict_error, AppError};

pub struct VeiculoController {
    repository: VeiculoRepository,
}

impl VeiculoController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VeiculoRepository::new(pool),
        }
    }

    pub async fn criar(
        &self,
        usuario: &UsuarioAtual,
        request: CriarVeiculoRequest,
    ) -> Result<ApiResponse<VeiculoResponse>, AppError> {
        exigir_gestao(usuario)?;
        request.validate()?;

        // A placa é única; o banco também garante via constraint
        if self.repository.placa_exists(&request.placa).await? {
            return Err(conflict_error("Veículo", "placa", &request.placa));
        }

        let veiculo = self
            .repository
            .create(request.placa, request.modelo, request.tipo, request.responsavel_id)
            .await?;

        Ok(ApiResponse::success_with_message(
            veiculo.into(),
            "Veículo cadastrado com sucesso".to_string(),
        ))
    }

    pub async fn obter(&self, id: i64) -> Result<VeiculoResponse, AppError> {
        let veiculo = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Veículo não encontrado".to_string()))?;

        Ok(veiculo.into())
    }

    pub async fn listar(&self) -> Result<Vec<VeiculoResponse>, AppError> {
        let veiculos = self.repository.list().await?;
        Ok(veiculos.into_iter().map(Into::into).collect())
    }

    pub async fn atualizar(
        &self,
        usuario: &UsuarioAtual,
        id: i64,
        request: AtualizarVeiculoRequest,
    ) -> Result<ApiResponse<VeiculoResponse>, AppError> {
        exigir_gestao(usuario)?;

        if let Some(status) = &request.status {
            if StatusVeiculo::parse(status).is_none() {
                return Err(AppError::Validation(format!(
                    "Status de veículo desconhecido: '{}'",
                    status
                )));
            }
        }

        let veiculo = self
            .repository
            .update(
                id,
                request.placa,
                request.modelo,
                request.tipo,
                request.status,
                request.responsavel_id,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            veiculo.into(),
            "Veículo atualizado com sucesso".to_string(),
        ))
    }

    /// Exclusão lógica: status vai para Inativo
    pub async fn excluir(
        &self,
        usuario: &UsuarioAtual,
        id: i64,
    ) -> Result<ApiResponse<VeiculoResponse>, AppError> {
        exigir_gestao(usuario)?;

        let veiculo = self.repository.soft_delete(id).await?;

        Ok(ApiResponse::success_with_message(
            veiculo.into(),
            "Veículo inativado com sucesso".to_string(),
        ))
    }
}
