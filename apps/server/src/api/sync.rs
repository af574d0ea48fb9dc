//! Interactive sync trigger.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use avery_sync_core::errors::RowWriteFailure;
use avery_sync_core::sync::{SyncReport, SyncWindow};
use avery_sync_core::{Error, Result};

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default, alias = "ownerIdentity")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailureView {
    pub transaction_id: String,
    pub operation: &'static str,
    pub status: Option<u16>,
    pub message: String,
}

impl From<&RowWriteFailure> for RowFailureView {
    fn from(failure: &RowWriteFailure) -> Self {
        Self {
            transaction_id: failure.transaction_id.clone(),
            operation: failure.operation.as_str(),
            status: failure.cause.status_code(),
            message: failure.cause.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub count: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub failures: Vec<RowFailureView>,
}

impl From<&SyncReport> for SyncResponse {
    fn from(report: &SyncReport) -> Self {
        Self {
            success: true,
            count: report.count(),
            created: report.created,
            updated: report.updated,
            failed: report.failures.len(),
            failures: report.failures.iter().map(RowFailureView::from).collect(),
        }
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Error::invalid_input(format!("{} must be YYYY-MM-DD, got {}", field, value))),
        None => Ok(None),
    }
}

/// Explicit bounds win; with neither bound given the trailing window applies.
pub fn resolve_window(
    request: &SyncRequest,
    trailing_days: u32,
    today: NaiveDate,
) -> Result<SyncWindow> {
    let from = parse_date("fromDate", request.from_date.as_deref())?;
    let to = parse_date("toDate", request.to_date.as_deref())?;
    match (from, to) {
        (None, None) => Ok(SyncWindow::trailing(today, trailing_days)),
        (from, to) => SyncWindow::new(from, to),
    }
}

/// Request email, then the stored owner, then the autosync owner.
fn resolve_owner(state: &AppState, request: &SyncRequest) -> Result<String> {
    let requested = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    if let Some(owner) = requested {
        return Ok(owner);
    }
    if let Some(owner) = state.settings.get_owner_identity()? {
        return Ok(owner);
    }
    state
        .settings
        .get_autosync_settings()?
        .and_then(|settings| settings.owner_identity)
        .filter(|owner| !owner.trim().is_empty())
        .ok_or_else(|| Error::invalid_input("Owner email is required"))
}

pub async fn perform_sync(
    state: &AppState,
    request: &SyncRequest,
    today: NaiveDate,
) -> Result<SyncReport> {
    let table_id = state
        .settings
        .get_destination_table_id()?
        .ok_or_else(|| Error::not_configured("Notion database not configured"))?;
    let owner = resolve_owner(state, request)?;
    let trailing_days = state
        .settings
        .get_autosync_settings()?
        .map(|settings| settings.trailing_days)
        .unwrap_or(state.config.trailing_days);
    let window = resolve_window(request, trailing_days, today)?;
    let service = state.sync_service()?;

    let _guard = state.lock_sync().await;
    info!("[Sync] Starting sync into {} for window {}", table_id, window);
    let report = service
        .run_sync_report(Some(table_id.as_str()), &window, &owner)
        .await?;

    for failure in &report.failures {
        warn!("[Sync] {}", failure);
    }
    info!(
        "[Sync] Finished: {} created, {} updated, {} failed",
        report.created,
        report.updated,
        report.failures.len()
    );
    Ok(report)
}

async fn run_notion_sync(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SyncRequest>,
) -> ApiResult<Json<SyncResponse>> {
    let today = Local::now().date_naive();
    let report = perform_sync(&state, &body, today).await?;
    Ok(Json(SyncResponse::from(&report)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/notion/sync", post(run_notion_sync))
}
