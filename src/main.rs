mod chat;
mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::auth::auth_middleware;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Carregar variáveis de ambiente
    dotenv().ok();
    let config = EnvironmentConfig::default();

    // Configurar logging (produção fica em INFO)
    let nivel = if config.is_production() {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt().with_max_level(nivel).init();

    info!("🚐 Gestão de Frota - API de viagens, veículos e chat");
    info!("====================================================");
    if config.is_development() {
        info!("🛠️ Modo desenvolvimento (CORS liberado, logs em DEBUG)");
    }

    // Inicializar banco de dados
    if let Ok(url) = std::env::var("DATABASE_URL") {
        info!("🗄️ Banco de dados: {}", database::mask_database_url(&url));
    }
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Erro conectando ao banco de dados: {}", e);
            return Err(anyhow::anyhow!("Erro de banco de dados: {}", e));
        }
    };

    if let Err(e) = database::run_migrations(&pool).await {
        error!("❌ Erro aplicando migrações: {}", e);
        return Err(anyhow::anyhow!("Erro de migração: {}", e));
    }

    let app_state = AppState::new(pool, config.clone());

    // Rotas que exigem principal autenticado
    let protegidas = Router::new()
        .nest("/api/viagens", routes::viagem_routes::create_viagem_router())
        .nest("/api/veiculos", routes::veiculo_routes::create_veiculo_router())
        .nest("/api/caronas", routes::carona_routes::create_carona_router())
        .nest("/api/auth", routes::auth_routes::create_me_router())
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        // O WebSocket autentica pelo token do query param
        .nest("/api/chat", routes::chat_routes::create_chat_router())
        .merge(protegidas)
        .layer(cors_middleware(&config))
        .with_state(app_state);

    // Porta do servidor
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando em http://{}", addr);
    info!("🔍 Endpoints disponíveis:");
    info!("   GET   /health - Health check");
    info!("🔑 Autenticação:");
    info!("   POST  /api/auth/login - Login");
    info!("   GET   /api/auth/me - Usuário atual");
    info!("🧭 Viagens:");
    info!("   POST  /api/viagens - Criar viagem");
    info!("   GET   /api/viagens - Listar viagens");
    info!("   GET   /api/viagens/:id - Obter viagem");
    info!("   DELETE /api/viagens/:id - Excluir viagem");
    info!("   PATCH /api/viagens/:id/alocacao - Alocar veículo/motorista");
    info!("   GET   /api/viagens/:id/disponibilidade - Pré-checagem de conflito");
    info!("   PATCH /api/viagens/:id/status - Transicionar status");
    info!("   PATCH /api/viagens/:id/km - Registrar hodômetro");
    info!("🚗 Veículos:");
    info!("   POST  /api/veiculos - Cadastrar veículo");
    info!("   GET   /api/veiculos - Listar veículos");
    info!("   GET   /api/veiculos/:id - Obter veículo");
    info!("   PUT   /api/veiculos/:id - Atualizar veículo");
    info!("   DELETE /api/veiculos/:id - Inativar veículo");
    info!("🙋 Caronas:");
    info!("   POST  /api/caronas - Criar pedidos em lote");
    info!("   GET   /api/caronas/viagem/:viagem_id - Pedidos de uma viagem");
    info!("   PATCH /api/caronas/:id/status - Aprovar/Reprovar");
    info!("💬 Chat:");
    info!("   GET   /api/chat/ws - WebSocket (presença + mensagens)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Erro do servidor: {}", e);
            e
        })?;

    info!("👋 Servidor encerrado");
    Ok(())
}

/// Health check simples
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "frota",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Sinal de desligamento gracioso
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C recebido, desligando servidor...");
        },
        _ = terminate => {
            info!("🛑 Sinal de término recebido, desligando servidor...");
        },
    }
}
