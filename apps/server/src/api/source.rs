//! Pass-through lookups against the transaction feed.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let accounts = state.avery_client()?.list_accounts(&email).await?;
    Ok(Json(accounts))
}

async fn check_reconsent(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let result = state.avery_client()?.check_expired_consent(&email).await?;
    info!("[Avery] Checked consent status for {}", email);
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts/{email}", get(list_accounts))
        .route("/reconsent/check/{email}", get(check_reconsent))
}
