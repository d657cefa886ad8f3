//! HTTP API server for the classroom dashboard

use super::error::{ApiError, ApiJson};
use crate::insights::{self, RecommendationReport};
use crate::services::Generation;
use crate::storage::StorageBackend;
use crate::types::{is_blank_payload, Classroom, ClassroomId, StoredSubmission, Teacher};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{debug, info};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
    /// Directory with the dashboard's static files
    pub public_dir: PathBuf,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([0, 0, 0, 0], 3000).into(),
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Submission, classroom and teacher storage
    pub storage: Arc<dyn StorageBackend>,
    /// Generation capability for recommendations
    pub generation: Generation,
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create new API server
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start serving until ctrl-c
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = build_router(self.state, &self.config.public_dir);
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        info!("Servidor corriendo en http://{}", self.config.addr);
        info!("Serving static files from {}", self.config.public_dir.display());

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal, stopping API server gracefully...");
    }
}

/// Build router
pub fn build_router(state: AppState, public_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/api/login", post(login_handler))
        .route("/api/aulas", get(list_classrooms_handler))
        .route(
            "/api/respuestas",
            post(create_submission_handler).get(list_all_submissions_handler),
        )
        .route("/api/respuestas/:aula_id", get(list_submissions_handler))
        .route("/api/ia/recomendaciones", post(recommendations_handler))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Login request
#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<Teacher>, ApiError> {
    match state.storage.authenticate(&req.username, &req.password).await? {
        Some(teacher) => {
            info!("Teacher {} logged in", teacher.username);
            Ok(Json(teacher))
        }
        None => {
            debug!("Rejected login for {:?}", req.username);
            Err(crate::error::AulaSenseError::InvalidCredentials.into())
        }
    }
}

async fn list_classrooms_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Classroom>>, ApiError> {
    Ok(Json(state.storage.list_classrooms().await?))
}

/// Survey submission request
#[derive(Debug, Deserialize)]
struct SubmissionRequest {
    #[serde(rename = "aulaId", default)]
    aula_id: Value,
    #[serde(default)]
    data: Value,
}

async fn create_submission_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SubmissionRequest>,
) -> Result<Json<Value>, ApiError> {
    let classroom = ClassroomId::from_json(&req.aula_id)
        .filter(|_| !is_blank_payload(&req.data))
        .ok_or_else(|| ApiError::BadRequest("Falta aulaId o data".to_string()))?;

    state.storage.append_submission(classroom, &req.data).await?;
    Ok(Json(json!({ "ok": true })))
}

async fn list_submissions_handler(
    State(state): State<AppState>,
    Path(aula_id): Path<String>,
) -> Result<Json<Vec<StoredSubmission>>, ApiError> {
    let classroom: ClassroomId = aula_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("aulaId inválido: {}", aula_id)))?;

    Ok(Json(state.storage.list_submissions(classroom).await?))
}

async fn list_all_submissions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredSubmission>>, ApiError> {
    Ok(Json(state.storage.list_all_submissions().await?))
}

/// Recommendation request
#[derive(Debug, Deserialize)]
struct RecommendationRequest {
    #[serde(rename = "aulaId", default)]
    aula_id: Value,
}

async fn recommendations_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RecommendationRequest>,
) -> Result<Json<RecommendationReport>, ApiError> {
    let classroom = ClassroomId::from_json(&req.aula_id)
        .ok_or_else(|| ApiError::BadRequest("Falta aulaId".to_string()))?;

    let report = insights::recommend(state.storage.as_ref(), &state.generation, classroom)
        .await
        .map_err(ApiError::generation)?;

    Ok(Json(report))
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    generation: bool,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generation: state.generation.is_enabled(),
    })
}
