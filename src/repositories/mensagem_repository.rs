//! Repositório de mensagens de chat
//!
//! A tabela é append-only: só há INSERT e SELECT.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::chat::ChatMensagem;
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct MensagemRepository {
    pool: PgPool,
}

impl MensagemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn inserir(
        &self,
        usuario_id: Option<i64>,
        nome: &str,
        texto: &str,
        suporte: bool,
    ) -> Result<ChatMensagem, AppError> {
        let mensagem = sqlx::query_as::<_, ChatMensagem>(
            r#"
            INSERT INTO chat_mensagens (usuario_id, nome, texto, suporte)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(nome)
        .bind(texto)
        .bind(suporte)
        .fetch_one(&self.pool)
        .await?;

        Ok(mensagem)
    }

    /// Histórico de um usuário, paginado por cursor `antes`.
    ///
    /// Busca do mais recente para o mais antigo (para o LIMIT cortar no
    /// lado certo) e inverte antes de devolver, ficando em ordem
    /// cronológica.
    pub async fn historico(
        &self,
        usuario_id: i64,
        limite: i64,
        antes: Option<DateTime<Utc>>,
    ) -> Result<Vec<ChatMensagem>, AppError> {
        let mut mensagens = sqlx::query_as::<_, ChatMensagem>(
            r#"
            SELECT * FROM chat_mensagens
             WHERE usuario_id = $1
               AND ($2::timestamptz IS NULL OR criado_em < $2)
             ORDER BY criado_em DESC, id DESC
             LIMIT $3
            "#,
        )
        .bind(usuario_id)
        .bind(antes)
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;

        mensagens.reverse();
        Ok(mensagens)
    }
}

// Testes que falam com um PostgreSQL real; rodam com
// `cargo test -- --ignored` e DATABASE_URL apontando para o banco de testes.
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    async fn pool_de_teste() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL para os testes de banco");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("conexão com o banco de testes");
        crate::database::run_migrations(&pool)
            .await
            .expect("migrações do banco de testes");
        pool
    }

    async fn cria_usuario(pool: &PgPool) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO usuarios (nome, email, senha_hash, papel)
             VALUES ('Ana', $1, '', 'Requisitante') RETURNING id",
        )
        .bind(format!("{}@teste.local", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn insere_em(pool: &PgPool, usuario_id: i64, texto: &str, criado_em: DateTime<Utc>) {
        sqlx::query(
            "INSERT INTO chat_mensagens (usuario_id, nome, texto, suporte, criado_em)
             VALUES ($1, 'Ana', $2, FALSE, $3)",
        )
        .bind(usuario_id)
        .bind(texto)
        .bind(criado_em)
        .execute(pool)
        .await
        .unwrap();
    }

    fn hora(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap()
    }

    #[tokio::test]
    #[ignore = "requer PostgreSQL em DATABASE_URL"]
    async fn historico_corta_pelo_limite_e_devolve_em_ordem_cronologica() {
        let pool = pool_de_teste().await;
        let repo = MensagemRepository::new(pool.clone());
        let usuario = cria_usuario(&pool).await;

        insere_em(&pool, usuario, "primeira", hora(10)).await;
        insere_em(&pool, usuario, "segunda", hora(11)).await;
        insere_em(&pool, usuario, "terceira", hora(12)).await;

        // O limite corta pelo lado mais antigo, a ordem devolvida é cronológica
        let historico = repo.historico(usuario, 2, None).await.unwrap();
        let textos: Vec<&str> = historico.iter().map(|m| m.texto.as_str()).collect();
        assert_eq!(textos, ["segunda", "terceira"]);
    }

    #[tokio::test]
    #[ignore = "requer PostgreSQL em DATABASE_URL"]
    async fn cursor_antes_e_exclusivo() {
        let pool = pool_de_teste().await;
        let repo = MensagemRepository::new(pool.clone());
        let usuario = cria_usuario(&pool).await;

        insere_em(&pool, usuario, "primeira", hora(10)).await;
        insere_em(&pool, usuario, "segunda", hora(11)).await;
        insere_em(&pool, usuario, "terceira", hora(12)).await;

        // A mensagem exatamente em `antes` fica de fora
        let historico = repo.historico(usuario, 10, Some(hora(11))).await.unwrap();
        let textos: Vec<&str> = historico.iter().map(|m| m.texto.as_str()).collect();
        assert_eq!(textos, ["primeira"]);
    }
}
