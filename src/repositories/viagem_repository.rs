//! Repositório de viagens
//!
//! Concentra as consultas SQL de viagem, incluindo a checagem de conflito
//! de recursos. Checagem e escrita de alocação rodam na MESMA transação
//! serializável: duas alocações concorrentes para o mesmo recurso/janela
//! não passam ambas pela checagem.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::viagem::{StatusViagem, TipoKm, Viagem, STATUS_BLOQUEANTES};
use crate::services::conflito::Janela;
use crate::utils::errors::{not_found_error, AppError};

/// Recurso sujeito a dupla reserva
#[derive(Debug, Clone, Copy)]
pub enum Recurso {
    Veiculo,
    Motorista,
}

impl Recurso {
    /// Coluna correspondente na tabela `viagens` (conjunto fechado)
    fn coluna(&self) -> &'static str {
        match self {
            Recurso::Veiculo => "veiculo_id",
            Recurso::Motorista => "motorista_id",
        }
    }

    pub fn descricao(&self) -> &'static str {
        match self {
            Recurso::Veiculo => "Veículo",
            Recurso::Motorista => "Motorista",
        }
    }
}

pub struct ViagemRepository {
    pool: PgPool,
}

impl ViagemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        solicitante_id: i64,
        destino: String,
        finalidade: String,
        qtd_passageiros: i32,
        tipo_veiculo_desejado: Option<String>,
        data_saida: DateTime<Utc>,
        data_retorno: DateTime<Utc>,
        observacoes: Option<String>,
    ) -> Result<Viagem, AppError> {
        let viagem = sqlx::query_as::<_, Viagem>(
            r#"
            INSERT INTO viagens
                (solicitante_id, destino, finalidade, qtd_passageiros,
                 tipo_veiculo_desejado, data_saida, data_retorno, status, observacoes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'Pendente', $8)
            RETURNING *
            "#,
        )
        .bind(solicitante_id)
        .bind(destino)
        .bind(finalidade)
        .bind(qtd_passageiros)
        .bind(tipo_veiculo_desejado)
        .bind(data_saida)
        .bind(data_retorno)
        .bind(observacoes)
        .fetch_one(&self.pool)
        .await?;

        Ok(viagem)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Viagem>, AppError> {
        let viagem = sqlx::query_as::<_, Viagem>("SELECT * FROM viagens WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(viagem)
    }

    pub async fn list(&self) -> Result<Vec<Viagem>, AppError> {
        let viagens =
            sqlx::query_as::<_, Viagem>("SELECT * FROM viagens ORDER BY data_saida DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(viagens)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM viagens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Viagem", id));
        }

        Ok(())
    }

    /// Existe compromisso conflitante para o recurso na janela candidata?
    ///
    /// Apenas viagens em status bloqueante contam; a própria viagem em
    /// avaliação é excluída da busca. Semântica de intervalo aberto:
    /// `data_saida < fim AND data_retorno > inicio`.
    pub async fn existe_conflito(
        &self,
        recurso: Recurso,
        recurso_id: i64,
        janela: &Janela,
        excluir_viagem_id: i64,
    ) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        conflito_recurso(&mut conn, recurso, recurso_id, janela, excluir_viagem_id).await
    }

    /// Aloca veículo e/ou motorista a uma viagem.
    ///
    /// Tudo acontece em uma transação serializável: SELECT ... FOR UPDATE da
    /// viagem, checagem de conflito por recurso e escrita da alocação. Se
    /// qualquer recurso conflitar, nada é persistido.
    pub async fn alocar(
        &self,
        id: i64,
        veiculo_id: Option<i64>,
        motorista_id: Option<i64>,
    ) -> Result<Viagem, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let viagem = sqlx::query_as::<_, Viagem>("SELECT * FROM viagens WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("Viagem", id))?;

        let status = viagem.status_atual()?;
        if !status.permite_alocacao() {
            return Err(AppError::Conflict(format!(
                "Alocação não é permitida com a viagem em status '{}'",
                viagem.status
            )));
        }

        let janela = Janela::nova(viagem.data_saida, viagem.data_retorno)?;

        for (recurso, recurso_id) in [
            (Recurso::Veiculo, veiculo_id),
            (Recurso::Motorista, motorista_id),
        ] {
            if let Some(recurso_id) = recurso_id {
                if conflito_recurso(&mut tx, recurso, recurso_id, &janela, id).await? {
                    return Err(AppError::Conflict(format!(
                        "{} já comprometido(a) em outra viagem no mesmo período",
                        recurso.descricao()
                    )));
                }
            }
        }

        let atualizada = sqlx::query_as::<_, Viagem>(
            r#"
            UPDATE viagens
               SET veiculo_id = COALESCE($2, veiculo_id),
                   motorista_id = COALESCE($3, motorista_id)
             WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(veiculo_id)
        .bind(motorista_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(atualizada)
    }

    /// Escrita compare-and-set do status: só grava se a linha ainda estiver
    /// no status que o controller validou. `None` significa que a viagem
    /// sumiu ou que outra transição chegou primeiro.
    pub async fn atualizar_status(
        &self,
        id: i64,
        de: StatusViagem,
        para: StatusViagem,
    ) -> Result<Option<Viagem>, AppError> {
        let viagem = sqlx::query_as::<_, Viagem>(
            "UPDATE viagens SET status = $3 WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(id)
        .bind(de.as_str())
        .bind(para.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(viagem)
    }

    /// Escrita guardada do hodômetro. O predicado do UPDATE repete a regra
    /// de escrita única para que dois registros concorrentes não passem
    /// ambos; `None` significa que a linha não estava mais no estado que o
    /// controller validou.
    pub async fn registrar_km(
        &self,
        id: i64,
        tipo: TipoKm,
        valor: i64,
    ) -> Result<Option<Viagem>, AppError> {
        let sql = match tipo {
            TipoKm::Inicial => {
                r#"
                UPDATE viagens SET km_inicial = $2
                 WHERE id = $1 AND km_inicial IS NULL
                RETURNING *
                "#
            }
            TipoKm::Final => {
                r#"
                UPDATE viagens SET km_final = $2
                 WHERE id = $1 AND km_inicial IS NOT NULL
                   AND km_final IS NULL AND $2 >= km_inicial
                RETURNING *
                "#
            }
        };

        let viagem = sqlx::query_as::<_, Viagem>(sql)
            .bind(id)
            .bind(valor)
            .fetch_optional(&self.pool)
            .await?;

        Ok(viagem)
    }
}

/// Consulta EXISTS de conflito, executável tanto no pool quanto dentro de
/// uma transação.
async fn conflito_recurso(
    conn: &mut PgConnection,
    recurso: Recurso,
    recurso_id: i64,
    janela: &Janela,
    excluir_viagem_id: i64,
) -> Result<bool, AppError> {
    let bloqueantes: Vec<String> = STATUS_BLOQUEANTES
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();

    let sql = format!(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM viagens
             WHERE {} = $1
               AND id <> $2
               AND status = ANY($3)
               AND data_saida < $4
               AND data_retorno > $5
        )
        "#,
        recurso.coluna()
    );

    let existe: bool = sqlx::query_scalar(&sql)
        .bind(recurso_id)
        .bind(excluir_viagem_id)
        .bind(&bloqueantes)
        .bind(janela.fim)
        .bind(janela.inicio)
        .fetch_one(conn)
        .await?;

    Ok(existe)
}
