//! Repositório de caronas

use sqlx::PgPool;

use crate::models::carona::{Carona, StatusCarona};
use crate::utils::errors::AppError;

pub struct CaronaRepository {
    pool: PgPool,
}

impl CaronaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Criação em lote: todos os pedidos entram Pendente na mesma transação
    pub async fn criar_lote(
        &self,
        viagem_id: i64,
        pedidos: &[(i64, String)],
    ) -> Result<Vec<Carona>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut caronas = Vec::with_capacity(pedidos.len());

        for (solicitante_id, motivo) in pedidos {
            let carona = sqlx::query_as::<_, Carona>(
                r#"
                INSERT INTO caronas (viagem_id, solicitante_id, motivo, status)
                VALUES ($1, $2, $3, 'Pendente')
                RETURNING *
                "#,
            )
            .bind(viagem_id)
            .bind(solicitante_id)
            .bind(motivo)
            .fetch_one(&mut *tx)
            .await?;
            caronas.push(carona);
        }

        tx.commit().await?;
        Ok(caronas)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Carona>, AppError> {
        let carona = sqlx::query_as::<_, Carona>("SELECT * FROM caronas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(carona)
    }

    pub async fn list_by_viagem(&self, viagem_id: i64) -> Result<Vec<Carona>, AppError> {
        let caronas = sqlx::query_as::<_, Carona>(
            "SELECT * FROM caronas WHERE viagem_id = $1 ORDER BY criado_em",
        )
        .bind(viagem_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(caronas)
    }

    /// Escrita compare-and-set: a transição só vale saindo do status que o
    /// controller validou. `None` = carona ausente ou já decidida por outro
    /// gestor.
    pub async fn atualizar_status(
        &self,
        id: i64,
        de: StatusCarona,
        para: StatusCarona,
    ) -> Result<Option<Carona>, AppError> {
        let carona = sqlx::query_as::<_, Carona>(
            "UPDATE caronas SET status = $3 WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(id)
        .bind(de.as_str())
        .bind(para.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(carona)
    }
}
