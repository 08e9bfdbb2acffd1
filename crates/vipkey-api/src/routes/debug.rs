use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde::Serialize;

use vipkey_core::AuthConfigSummary;

use crate::state::AppState;

#[derive(Serialize)]
pub struct AuthConfigResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub auth_config: AuthConfigSummary,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth-config", get(auth_config))
}

/// GET /debug/auth-config
///
/// Reports what the authorization file contains without exposing passwords.
/// The file is read on the blocking pool.
async fn auth_config(
    State(state): State<AppState>,
) -> Result<Json<AuthConfigResponse>, StatusCode> {
    let auth = state.auth.clone();
    let summary = tokio::task::spawn_blocking(move || auth.describe())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Auth config task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    tracing::debug!(
        file_exists = summary.file_exists,
        authorized = summary.authorized_emails.len(),
        "Served auth config summary"
    );

    Ok(Json(AuthConfigResponse {
        status: "ok",
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        auth_config: summary,
    }))
}
