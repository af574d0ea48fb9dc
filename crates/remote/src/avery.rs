//! Transaction source adapter for the Avery aggregator API.
//!
//! Transactions are listed per owner email within an optional date window.
//! The endpoint usually answers with a bare array; a paged envelope with a
//! continuation cursor is followed until the cursor runs out. Account and
//! consent lookups are passed through as raw JSON.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use avery_sync_core::sync::SyncWindow;
use avery_sync_core::transactions::{Transaction, TransactionSourceTrait, TransactionStatus};

use crate::client::RemoteClient;
use crate::error::{classify_http_status, RemoteError, RetryClass};
use crate::pacer::Pacer;
use crate::pagination::{collect_all, Page};

pub const DEFAULT_AVERY_BASE_URL: &str = "https://app.averyapp.ai";
const AUTH_KEY_HEADER: &str = "authkey";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AveryTransaction {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    transaction_id: Option<Value>,
    #[serde(default, rename = "transaction_id")]
    transaction_id_snake: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    merchant: Option<String>,
    #[serde(default)]
    memo: Option<String>,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    account_name: Option<String>,
    #[serde(default)]
    institution_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TransactionsResponse {
    List(Vec<AveryTransaction>),
    Paged {
        #[serde(alias = "data")]
        transactions: Vec<AveryTransaction>,
        #[serde(default, rename = "nextCursor", alias = "next_cursor")]
        next_cursor: Option<String>,
    },
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts a calendar date or an RFC 3339 timestamp and keeps the date part.
fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AveryTransaction {
    fn into_transaction(self) -> Transaction {
        let id = [&self.id, &self.transaction_id, &self.transaction_id_snake]
            .into_iter()
            .flatten()
            .find_map(id_string)
            .unwrap_or_default();

        Transaction {
            id,
            description: non_blank(self.description),
            merchant: non_blank(self.merchant),
            memo: non_blank(self.memo),
            amount: self.amount.unwrap_or_default(),
            date: self.date.as_deref().and_then(parse_feed_date),
            account_name: non_blank(self.account_name),
            institution_name: non_blank(self.institution_name),
            status: TransactionStatus::from_feed(self.status.as_deref()),
            avery_category: None,
        }
    }
}

/// Maps transport errors into the source taxonomy: client errors other than
/// rate limiting mean the feed will not serve us.
fn source_error(err: RemoteError) -> avery_sync_core::Error {
    match err {
        RemoteError::Api { status, body }
            if classify_http_status(status) == RetryClass::Permanent
                && (400..500).contains(&status) =>
        {
            avery_sync_core::Error::source_unavailable(format!(
                "Transaction source rejected request ({}): {}",
                status, body
            ))
        }
        RemoteError::Auth(message) => avery_sync_core::Error::source_unavailable(message),
        other => other.into(),
    }
}

fn require_owner(owner_identity: &str) -> avery_sync_core::Result<&str> {
    let owner_identity = owner_identity.trim();
    if owner_identity.is_empty() {
        return Err(avery_sync_core::Error::source_unavailable(
            "Owner identity is required",
        ));
    }
    Ok(owner_identity)
}

/// Client for the transaction aggregator.
#[derive(Debug, Clone)]
pub struct AveryClient {
    remote: RemoteClient,
}

impl AveryClient {
    /// # Arguments
    ///
    /// * `base_url` - Aggregator API base (e.g., "https://app.averyapp.ai")
    /// * `auth_key` - Integration key sent in the `authkey` header
    /// * `pacer` - Throttle shared by every client of this service
    pub fn new(
        base_url: &str,
        auth_key: &str,
        pacer: Arc<Pacer>,
    ) -> avery_sync_core::Result<Self> {
        Self::build(base_url, auth_key, pacer).map_err(source_error)
    }

    fn build(base_url: &str, auth_key: &str, pacer: Arc<Pacer>) -> crate::error::Result<Self> {
        let auth_key = auth_key.trim();
        if auth_key.is_empty() {
            return Err(RemoteError::auth("Transaction source key not configured"));
        }
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTH_KEY_HEADER,
            HeaderValue::from_str(auth_key)
                .map_err(|_| RemoteError::auth("Invalid transaction source key format"))?,
        );
        Ok(Self {
            remote: RemoteClient::new(base_url, headers, pacer)?,
        })
    }

    pub fn with_remote(remote: RemoteClient) -> Self {
        Self { remote }
    }

    /// Linked bank accounts for an owner, as returned by the aggregator.
    ///
    /// GET /accounts/user/{email}
    pub async fn list_accounts(&self, owner_identity: &str) -> avery_sync_core::Result<Value> {
        self.get_for_owner("/accounts/user", owner_identity).await
    }

    /// Accounts whose open-banking consent has lapsed and needs renewing.
    ///
    /// GET /consent/expired/{email}
    pub async fn check_expired_consent(
        &self,
        owner_identity: &str,
    ) -> avery_sync_core::Result<Value> {
        self.get_for_owner("/consent/expired", owner_identity).await
    }

    async fn get_for_owner(
        &self,
        prefix: &str,
        owner_identity: &str,
    ) -> avery_sync_core::Result<Value> {
        let owner_identity = require_owner(owner_identity)?;
        let path = format!("{}/{}", prefix, urlencoding::encode(owner_identity));
        let body: Option<Value> = self
            .remote
            .send(Method::GET, &path, None)
            .await
            .map_err(source_error)?;
        Ok(body.unwrap_or(Value::Null))
    }

    /// Fetch one page of an owner's transactions.
    ///
    /// GET /transactions/user/{email}?fromDate=&toDate=&cursor=
    async fn list_transactions_page(
        &self,
        owner_identity: &str,
        window: &SyncWindow,
        cursor: Option<String>,
    ) -> crate::error::Result<Page<AveryTransaction>> {
        let path = format!(
            "/transactions/user/{}",
            urlencoding::encode(owner_identity)
        );
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(from) = window.from {
            query.push(("fromDate", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = window.to {
            query.push(("toDate", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let response: Option<TransactionsResponse> = self
            .remote
            .send_with_query(Method::GET, &path, &query, None)
            .await?;

        Ok(match response {
            None => Page::last(Vec::new()),
            Some(TransactionsResponse::List(items)) => Page::last(items),
            Some(TransactionsResponse::Paged {
                transactions,
                next_cursor,
            }) => Page {
                items: transactions,
                next_cursor,
            },
        })
    }
}

#[async_trait]
impl TransactionSourceTrait for AveryClient {
    async fn fetch_transactions(
        &self,
        owner_identity: &str,
        window: &SyncWindow,
    ) -> avery_sync_core::Result<Vec<Transaction>> {
        let owner_identity = require_owner(owner_identity)?;

        debug!("Fetching transactions for window {}", window);
        let raw = collect_all(|cursor| self.list_transactions_page(owner_identity, window, cursor))
            .await
            .map_err(source_error)?;

        let transactions: Vec<Transaction> = raw
            .into_iter()
            .map(AveryTransaction::into_transaction)
            .collect();
        info!(
            "Fetched {} transaction(s) for window {}",
            transactions.len(),
            window
        );
        Ok(transactions)
    }
}
