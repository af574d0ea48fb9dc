//! Provisioning and read-side endpoints for the Notion table.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use avery_sync_core::destination::{DestinationService, PageSummary, TableHandle, TableMetadata};
use avery_sync_core::Error;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPagesRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchPagesResponse {
    pub results: Vec<PageSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    pub parent_page_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseInfoResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<TableMetadata>,
}

async fn search_pages(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchPagesRequest>,
) -> ApiResult<Json<SearchPagesResponse>> {
    let query = body.query.unwrap_or_default();
    let results = state.destination_service()?.search_pages(&query).await?;
    info!("[Notion] Page search for {:?} returned {} result(s)", query, results.len());
    Ok(Json(SearchPagesResponse { results }))
}

async fn create_database(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateDatabaseRequest>,
) -> ApiResult<Json<TableHandle>> {
    let table = state
        .destination_service()?
        .provision_table(&body.parent_page_id, body.title.as_deref())
        .await?;
    info!("[Notion] Database {} is now the sync destination", table.id);
    Ok(Json(table))
}

async fn get_database(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DatabaseInfoResponse>> {
    if state.settings.get_destination_table_id()?.is_none() {
        return Ok(Json(DatabaseInfoResponse {
            configured: false,
            database: None,
        }));
    }
    let database = state.destination_service()?.table_info().await?;
    Ok(Json(DatabaseInfoResponse {
        configured: database.is_some(),
        database,
    }))
}

/// Categories on the table plus those named by rules.
///
/// Without a Notion token only the rule categories are returned.
async fn known_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    match state.destination_service() {
        Ok(service) => Ok(Json(service.known_categories().await?)),
        Err(Error::NotConfigured(reason)) => {
            warn!("[Rules] Listing rule categories only: {}", reason);
            Ok(Json(DestinationService::rule_categories(
                state.settings.as_ref(),
            )?))
        }
        Err(err) => Err(err.into()),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notion/pages/search", post(search_pages))
        .route("/notion/database/create", post(create_database))
        .route("/notion/database", get(get_database))
        .route("/categories/known", get(known_categories))
}
