use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use avery_sync_core::destination::{
    PageSummary, RowHandle, TableHandle, TableMetadata, TableStoreTrait, TRANSACTION_ID_COLUMN,
};
use avery_sync_core::transactions::Transaction;

use super::properties::{new_row_properties, page_transaction_id, plain_text, row_properties};
use super::schema::{database_properties, table_metadata};
use crate::client::{bearer, RemoteClient};
use crate::error::{RemoteError, Result};
use crate::pacer::Pacer;
use crate::pagination::{collect_all, Page};

pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 25;

/// Paginated list envelope returned by search and database queries.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl ListResponse {
    fn into_page(self) -> Page<Value> {
        Page {
            items: self.results,
            next_cursor: if self.has_more { self.next_cursor } else { None },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ObjectRef {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

fn is_live(page: &Value) -> bool {
    let flag = |key: &str| page.get(key).and_then(Value::as_bool).unwrap_or(false);
    !flag("archived") && !flag("in_trash")
}

/// Title of a search result: database title, or the page's title property.
fn result_title(item: &Value) -> String {
    if let Some(title) = item.get("title") {
        return plain_text(title);
    }
    item.get("properties")
        .and_then(Value::as_object)
        .and_then(|props| {
            props
                .values()
                .find_map(|prop| prop.get("title").map(plain_text))
        })
        .unwrap_or_default()
}

fn page_summary(item: &Value) -> Option<PageSummary> {
    Some(PageSummary {
        id: item.get("id")?.as_str()?.to_string(),
        object: item
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or("page")
            .to_string(),
        title: result_title(item),
        url: item.get("url").and_then(Value::as_str).map(str::to_string),
    })
}

fn with_cursor(mut body: Map<String, Value>, cursor: Option<String>) -> Value {
    if let Some(cursor) = cursor {
        body.insert("start_cursor".to_string(), Value::String(cursor));
    }
    Value::Object(body)
}

/// Notion-backed transactions table.
///
/// Shares one [`Pacer`] across every call so the integration stays under
/// Notion's request rate.
#[derive(Debug, Clone)]
pub struct NotionClient {
    remote: RemoteClient,
}

impl NotionClient {
    pub fn new(
        base_url: &str,
        access_token: &str,
        pacer: Arc<Pacer>,
    ) -> avery_sync_core::Result<Self> {
        Ok(Self::build(base_url, access_token, pacer)?)
    }

    fn build(base_url: &str, access_token: &str, pacer: Arc<Pacer>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer(access_token)?);
        headers.insert(
            HeaderName::from_static("notion-version"),
            HeaderValue::from_static(NOTION_VERSION),
        );
        Ok(Self {
            remote: RemoteClient::new(base_url, headers, pacer)?,
        })
    }

    pub fn with_remote(remote: RemoteClient) -> Self {
        Self { remote }
    }

    async fn search_page(&self, query: &str, cursor: Option<String>) -> Result<Page<Value>> {
        let mut body = Map::new();
        body.insert("query".to_string(), json!(query));
        body.insert("page_size".to_string(), json!(PAGE_SIZE));
        let response: ListResponse = self
            .remote
            .send(Method::POST, "/search", Some(&with_cursor(body, cursor)))
            .await?;
        Ok(response.into_page())
    }

    async fn query_by_transaction_id(
        &self,
        table_id: &str,
        transaction_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<Value>> {
        let mut body = Map::new();
        body.insert(
            "filter".to_string(),
            json!({
                "property": TRANSACTION_ID_COLUMN,
                "rich_text": { "equals": transaction_id }
            }),
        );
        body.insert("page_size".to_string(), json!(PAGE_SIZE));
        let path = format!("/databases/{}/query", table_id);
        let response: ListResponse = self
            .remote
            .send(Method::POST, &path, Some(&with_cursor(body, cursor)))
            .await?;
        Ok(response.into_page())
    }

    async fn find_row(&self, table_id: &str, transaction_id: &str) -> Result<Option<RowHandle>> {
        let results = collect_all(|cursor| {
            self.query_by_transaction_id(table_id, transaction_id, cursor)
        })
        .await?;

        let mut matches = results.iter().filter(|page| {
            is_live(page) && page_transaction_id(page).as_deref() == Some(transaction_id)
        });
        let Some(first) = matches.next() else {
            return Ok(None);
        };
        let extra = matches.count();
        if extra > 0 {
            warn!(
                "[Notion] {} duplicate row(s) for transaction {}, updating the first",
                extra, transaction_id
            );
        }

        let row: ObjectRef = serde_json::from_value(first.clone())?;
        Ok(Some(RowHandle { id: row.id }))
    }

    async fn post_database(&self, parent_page_id: &str, title: &str) -> Result<TableHandle> {
        let body = json!({
            "parent": { "type": "page_id", "page_id": parent_page_id },
            "title": [{ "type": "text", "text": { "content": title } }],
            "properties": database_properties(),
        });
        let created: ObjectRef = self
            .remote
            .send(Method::POST, "/databases", Some(&body))
            .await?;
        info!("[Notion] Created database {} under {}", created.id, parent_page_id);
        Ok(TableHandle {
            id: created.id,
            url: created.url,
        })
    }

    async fn post_page(&self, table_id: &str, tx: &Transaction) -> Result<RowHandle> {
        let body = json!({
            "parent": { "database_id": table_id },
            "properties": new_row_properties(tx),
        });
        let created: ObjectRef = self.remote.send(Method::POST, "/pages", Some(&body)).await?;
        debug!("[Notion] Created row {} for transaction {}", created.id, tx.id);
        Ok(RowHandle { id: created.id })
    }

    async fn patch_page(&self, row: &RowHandle, tx: &Transaction) -> Result<()> {
        if row.id.trim().is_empty() {
            return Err(RemoteError::invalid_request("Row id is required"));
        }
        let body = json!({ "properties": row_properties(tx) });
        let path = format!("/pages/{}", row.id);
        let _: Value = self.remote.send(Method::PATCH, &path, Some(&body)).await?;
        debug!("[Notion] Updated row {} for transaction {}", row.id, tx.id);
        Ok(())
    }

    async fn fetch_database(&self, table_id: &str) -> Result<TableMetadata> {
        let path = format!("/databases/{}", table_id);
        let database: Value = self.remote.send(Method::GET, &path, None).await?;
        Ok(table_metadata(&database))
    }
}

#[async_trait]
impl TableStoreTrait for NotionClient {
    async fn create_table(
        &self,
        parent_page_id: &str,
        title: &str,
    ) -> avery_sync_core::Result<TableHandle> {
        Ok(self.post_database(parent_page_id, title).await?)
    }

    async fn find_row_by_transaction_id(
        &self,
        table_id: &str,
        transaction_id: &str,
    ) -> avery_sync_core::Result<Option<RowHandle>> {
        Ok(self.find_row(table_id, transaction_id).await?)
    }

    async fn create_row(
        &self,
        table_id: &str,
        transaction: &Transaction,
    ) -> avery_sync_core::Result<RowHandle> {
        Ok(self.post_page(table_id, transaction).await?)
    }

    async fn update_row(
        &self,
        row: &RowHandle,
        transaction: &Transaction,
    ) -> avery_sync_core::Result<()> {
        Ok(self.patch_page(row, transaction).await?)
    }

    async fn get_table(&self, table_id: &str) -> avery_sync_core::Result<TableMetadata> {
        Ok(self.fetch_database(table_id).await?)
    }

    async fn search_pages(&self, query: &str) -> avery_sync_core::Result<Vec<PageSummary>> {
        let results = collect_all(|cursor| self.search_page(query, cursor)).await?;
        Ok(results.iter().filter_map(page_summary).collect())
    }
}
