//! Repositório de veículos

use sqlx::PgPool;

use crate::models::veiculo::{StatusVeiculo, Veiculo};
use crate::utils::errors::{not_found_error, AppError};

pub struct VeiculoRepository {
    pool: PgPool,
}

impl VeiculoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        placa: String,
        modelo: Option<String>,
        tipo: Option<String>,
        responsavel_id: Option<i64>,
    ) -> Result<Veiculo, AppError> {
        let veiculo = sqlx::query_as::<_, Veiculo>(
            r#"
            INSERT INTO veiculos (placa, modelo, tipo, status, responsavel_id)
            VALUES ($1, $2, $3, 'Disponivel', $4)
            RETURNING *
            "#,
        )
        .bind(placa)
        .bind(modelo)
        .bind(tipo)
        .bind(responsavel_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(veiculo)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Veiculo>, AppError> {
        let veiculo = sqlx::query_as::<_, Veiculo>("SELECT * FROM veiculos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(veiculo)
    }

    pub async fn list(&self) -> Result<Vec<Veiculo>, AppError> {
        let veiculos = sqlx::query_as::<_, Veiculo>("SELECT * FROM veiculos ORDER BY placa")
            .fetch_all(&self.pool)
            .await?;

        Ok(veiculos)
    }

    pub async fn placa_exists(&self, placa: &str) -> Result<bool, AppError> {
        let existe: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM veiculos WHERE placa = $1)")
                .bind(placa)
                .fetch_one(&self.pool)
                .await?;

        Ok(existe)
    }

    pub async fn update(
        &self,
        id: i64,
        placa: Option<String>,
        modelo: Option<String>,
        tipo: Option<String>,
        status: Option<String>,
        responsavel_id: Option<i64>,
    ) -> Result<Veiculo, AppError> {
        let veiculo = sqlx::query_as::<_, Veiculo>(
            r#"
            UPDATE veiculos
               SET placa = COALESCE($2, placa),
                   modelo = COALESCE($3, modelo),
                   tipo = COALESCE($4, tipo),
                   status = COALESCE($5, status),
                   responsavel_id = COALESCE($6, responsavel_id)
             WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(placa)
        .bind(modelo)
        .bind(tipo)
        .bind(status)
        .bind(responsavel_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Veículo", id))?;

        Ok(veiculo)
    }

    /// Exclusão lógica: o veículo vai para Inativo, a linha permanece
    pub async fn soft_delete(&self, id: i64) -> Result<Veiculo, AppError> {
        let veiculo = sqlx::query_as::<_, Veiculo>(
            "UPDATE veiculos SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(StatusVeiculo::Inativo.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Veículo", id))?;

        Ok(veiculo)
    }
}
