//! Category rules, owner, token and autosync preferences.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use avery_sync_core::categories::CategoryRule;
use avery_sync_core::settings::AutosyncSettings;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRuleRequest {
    #[serde(alias = "match")]
    pub match_text: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct OwnerRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenStatus {
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct Acknowledged {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl Acknowledged {
    fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Category rules
// ─────────────────────────────────────────────────────────────────────────────

async fn list_rules(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CategoryRule>>> {
    Ok(Json(state.settings.list_category_rules()?))
}

async fn add_rule(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddRuleRequest>,
) -> ApiResult<Json<Vec<CategoryRule>>> {
    let rule = CategoryRule::new(&body.match_text, &body.category)?;
    info!("[Rules] Adding rule {:?} -> {}", rule.match_text, rule.category);
    Ok(Json(state.settings.add_category_rule(rule)?))
}

async fn reset_rules(State(state): State<Arc<AppState>>) -> ApiResult<Json<Acknowledged>> {
    state.settings.reset_category_rules()?;
    info!("[Rules] Cleared all category rules");
    Ok(Acknowledged::ok())
}

// ─────────────────────────────────────────────────────────────────────────────
// Owner and destination token
// ─────────────────────────────────────────────────────────────────────────────

async fn get_owner(State(state): State<Arc<AppState>>) -> ApiResult<Json<OwnerResponse>> {
    Ok(Json(OwnerResponse {
        email: state.settings.get_owner_identity()?,
    }))
}

async fn set_owner(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OwnerRequest>,
) -> ApiResult<Json<OwnerResponse>> {
    state.settings.set_owner_identity(body.email.as_deref())?;
    get_owner(State(state)).await
}

async fn store_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TokenRequest>,
) -> ApiResult<Json<TokenStatus>> {
    state.settings.set_destination_token(Some(&body.access_token))?;
    info!("[Notion] Access token stored");
    token_status(State(state)).await
}

async fn clear_token(State(state): State<Arc<AppState>>) -> ApiResult<Json<TokenStatus>> {
    state.settings.set_destination_token(None)?;
    info!("[Notion] Access token cleared");
    token_status(State(state)).await
}

async fn token_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<TokenStatus>> {
    Ok(Json(TokenStatus {
        configured: state.destination_token()?.is_some(),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Autosync and reset
// ─────────────────────────────────────────────────────────────────────────────

async fn get_autosync(State(state): State<Arc<AppState>>) -> ApiResult<Json<AutosyncSettings>> {
    let settings = state.settings.get_autosync_settings()?.unwrap_or(AutosyncSettings {
        trailing_days: state.config.trailing_days,
        ..AutosyncSettings::default()
    });
    Ok(Json(settings))
}

async fn set_autosync(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AutosyncSettings>,
) -> ApiResult<Json<AutosyncSettings>> {
    state.settings.set_autosync_settings(&body)?;
    info!(
        "[Sync] Autosync {} ({} trailing day(s))",
        if body.enabled { "enabled" } else { "disabled" },
        body.trailing_days
    );
    Ok(Json(body))
}

async fn reset_configuration(State(state): State<Arc<AppState>>) -> ApiResult<Json<Acknowledged>> {
    state.settings.reset()?;
    info!("Configuration reset");
    Ok(Json(Acknowledged {
        success: true,
        message: Some("Configuration reset successfully"),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/categories/rules",
            get(list_rules).post(add_rule).delete(reset_rules),
        )
        .route("/owner", get(get_owner).post(set_owner))
        .route("/notion/token", post(store_token).delete(clear_token))
        .route("/notion/token/status", get(token_status))
        .route("/autosync", get(get_autosync).post(set_autosync))
        .route("/reset", post(reset_configuration))
}
