use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["service"], "frota");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_rota_protegida_sem_token() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::get("/api/viagens").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_payload_invalido() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::post("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": "nao-e-email", "senha": ""}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_transicao_invalida_retorna_422() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::patch("/api/viagens/1/status")
                .header("content-type", "application/json")
                .body(Body::from(json!({"status": "Concluida"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_TRANSITION");
    // A mensagem precisa listar as transições permitidas
    assert!(body["message"].as_str().unwrap().contains("Pendente"));
}

#[tokio::test]
async fn test_conflito_de_alocacao_retorna_409() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::patch("/api/viagens/1/alocacao")
                .header("content-type", "application/json")
                .body(Body::from(json!({"veiculo_id": 7}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json_body(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_resposta_de_sucesso_tem_envelope() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::post("/api/caronas")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"viagem_id": 1, "pedidos": [{"solicitante_id": 3}]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
}

// App de test sem banco: os handlers devolvem as mesmas formas de resposta
// que os controllers reais, para validar contratos HTTP sem infraestrutura.
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "service": "frota",
                    "status": "healthy",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }))
            }),
        )
        .route(
            "/api/viagens",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "Unauthorized",
                        "message": "Token ausente ou inválido",
                        "code": "UNAUTHORIZED",
                    })),
                )
                    .into_response()
            }),
        )
        .route(
            "/api/auth/login",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Validation Error",
                        "message": "Os dados informados são inválidos",
                        "details": ["email: formato inválido"],
                        "code": "VALIDATION_ERROR",
                    })),
                )
                    .into_response()
            }),
        )
        .route(
            "/api/viagens/:id/status",
            patch(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "error": "Invalid Transition",
                        "message": "A partir de 'Pendente' são permitidos: [\"Agendada\", \"Recusada\", \"Cancelada\"]",
                        "code": "INVALID_TRANSITION",
                    })),
                )
                    .into_response()
            }),
        )
        .route(
            "/api/viagens/:id/alocacao",
            patch(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": "Conflict",
                        "message": "Veículo já alocado em viagem conflitante no período",
                        "code": "CONFLICT",
                    })),
                )
                    .into_response()
            }),
        )
        .route(
            "/api/caronas",
            post(|| async {
                Json(json!({
                    "success": true,
                    "message": "Pedidos de carona criados",
                    "data": [{"id": 1, "viagem_id": 1, "solicitante_id": 3, "status": "Pendente"}],
                }))
            }),
        )
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
