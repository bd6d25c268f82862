//! Servidor web Axum que expõe o reconhecedor de datas via HTTP

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use date_core::{
    pattern::PatternSpec, DateRecognizer, RecognizerConfig, RecognizerResult, DATE_TIME,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Estado compartilhado da aplicação
struct AppState {
    recognizer: DateRecognizer,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
    #[serde(default)]
    entities: Option<Vec<String>>,
    #[serde(default)]
    context_bonus: Option<f64>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    results: Vec<RecognizerResult>,
    processing_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let recognizer = match std::env::var("DATE_PATTERNS_FILE") {
        Ok(path) => {
            info!("Carregando configuração de {}", path);
            DateRecognizer::from_config(&RecognizerConfig::from_path(&path)?)?
        }
        Err(_) => DateRecognizer::new(),
    };
    info!("{} padrões de data carregados", recognizer.patterns().len());

    let state = Arc::new(AppState { recognizer });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/patterns", get(patterns_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = std::env::var("DATE_WEB_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor de datas iniciado em http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Análise via HTTP POST. Sem `entities`, pede apenas `DATE_TIME`.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let bonus = req.context_bonus.unwrap_or(0.0);
    if !bonus.is_finite() {
        warn!("context_bonus inválido: {}", bonus);
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "context_bonus inválido"})),
        )
            .into_response();
    }

    let entities = req
        .entities
        .unwrap_or_else(|| vec![DATE_TIME.to_string()]);

    let started = std::time::Instant::now();
    // Varredura é CPU pura; roda fora do runtime assíncrono
    let handle = tokio::task::spawn_blocking(move || {
        state
            .recognizer
            .analyze_with_context(&req.text, &entities, bonus)
    });

    match handle.await {
        Ok(results) => Json(AnalyzeResponse {
            results,
            processing_ms: started.elapsed().as_millis() as u64,
        })
        .into_response(),
        Err(e) => {
            warn!("falha na análise: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "falha na análise"})),
            )
                .into_response()
        }
    }
}

/// Lista o catálogo ativo
async fn patterns_handler(State(state): State<Arc<AppState>>) -> Json<Vec<PatternSpec>> {
    Json(state.recognizer.patterns().specs())
}
