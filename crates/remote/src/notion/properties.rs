//! Conversion between transactions and Notion page properties.

use serde_json::{json, Map, Value};

use avery_sync_core::destination::{
    ACCOUNT_COLUMN, AMOUNT_COLUMN, CATEGORY_COLUMN, DATE_COLUMN, MERCHANT_COLUMN, NAME_COLUMN,
    NOTES_COLUMN, STATUS_COLUMN, TRANSACTION_ID_COLUMN,
};
use avery_sync_core::transactions::Transaction;

/// Notion rejects rich text segments longer than this.
pub const MAX_TEXT_CHARS: usize = 2000;
const FALLBACK_NAME: &str = "Transaction";

fn truncate(value: &str) -> String {
    value.chars().take(MAX_TEXT_CHARS).collect()
}

fn text_segments(value: &str) -> Value {
    exact_text_segments(&truncate(value))
}

fn exact_text_segments(value: &str) -> Value {
    json!([{ "type": "text", "text": { "content": value } }])
}

/// Select option names may not contain commas.
fn select_name(value: &str) -> String {
    truncate(value.trim()).replace(',', ";")
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Properties written on every upsert.
pub fn row_properties(tx: &Transaction) -> Map<String, Value> {
    let mut props = Map::new();

    props.insert(
        NAME_COLUMN.to_string(),
        json!({ "title": text_segments(tx.display_text().unwrap_or(FALLBACK_NAME)) }),
    );
    if let Some(date) = tx.date {
        props.insert(
            DATE_COLUMN.to_string(),
            json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } }),
        );
    }
    props.insert(AMOUNT_COLUMN.to_string(), json!({ "number": tx.amount }));
    if let Some(category) = non_blank(&tx.avery_category) {
        props.insert(
            CATEGORY_COLUMN.to_string(),
            json!({ "select": { "name": select_name(category) } }),
        );
    }
    if let Some(account) = non_blank(&tx.account_name) {
        props.insert(
            ACCOUNT_COLUMN.to_string(),
            json!({ "select": { "name": select_name(account) } }),
        );
    }
    if let Some(merchant) = non_blank(&tx.merchant) {
        props.insert(
            MERCHANT_COLUMN.to_string(),
            json!({ "rich_text": text_segments(merchant) }),
        );
    }
    props.insert(
        STATUS_COLUMN.to_string(),
        json!({ "select": { "name": tx.status.as_str() } }),
    );
    // The key is written verbatim; oversized ids are refused before a write.
    props.insert(
        TRANSACTION_ID_COLUMN.to_string(),
        json!({ "rich_text": exact_text_segments(&tx.id) }),
    );

    props
}

/// Properties for a new row: the upsert set plus seeded notes.
///
/// Notes are left alone on update so edits made in Notion survive.
pub fn new_row_properties(tx: &Transaction) -> Map<String, Value> {
    let mut props = row_properties(tx);
    if let Some(notes) = non_blank(&tx.memo).or_else(|| non_blank(&tx.institution_name)) {
        props.insert(
            NOTES_COLUMN.to_string(),
            json!({ "rich_text": text_segments(notes) }),
        );
    }
    props
}

/// Concatenated plain text of a title or rich_text array.
pub fn plain_text(segments: &Value) -> String {
    segments
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.get("plain_text")
                        .or_else(|| item.pointer("/text/content"))
                        .and_then(Value::as_str)
                })
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Plain text of the Transaction ID property on a page object.
pub fn page_transaction_id(page: &Value) -> Option<String> {
    page.get("properties")
        .and_then(|props| props.get(TRANSACTION_ID_COLUMN))
        .and_then(|prop| prop.get("rich_text"))
        .map(plain_text)
}
