use serde_json::{json, Map, Value};

use avery_sync_core::destination::{
    ColumnKind, ColumnSpec, TableMetadata, ACCOUNT_COLUMN, CATEGORY_COLUMN,
    TRANSACTION_TABLE_COLUMNS,
};

use super::properties::plain_text;

fn column_definition(column: &ColumnSpec) -> Value {
    match column.kind {
        ColumnKind::Title => json!({ "title": {} }),
        ColumnKind::Date => json!({ "date": {} }),
        ColumnKind::Number => json!({ "number": {} }),
        ColumnKind::Select => json!({ "select": { "options": [] } }),
        ColumnKind::ClosedSelect(options) => {
            let options: Vec<Value> = options.iter().map(|name| json!({ "name": name })).collect();
            json!({ "select": { "options": options } })
        }
        ColumnKind::RichText => json!({ "rich_text": {} }),
    }
}

/// Property schema for a new transactions database.
pub fn database_properties() -> Map<String, Value> {
    TRANSACTION_TABLE_COLUMNS
        .iter()
        .map(|column| (column.name.to_string(), column_definition(column)))
        .collect()
}

fn select_options(database: &Value, column: &str) -> Vec<String> {
    database
        .pointer(&format!("/properties/{}/select/options", column))
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|option| option.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Reads a database object into [`TableMetadata`].
pub fn table_metadata(database: &Value) -> TableMetadata {
    TableMetadata {
        id: database
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        title: database.get("title").map(plain_text).unwrap_or_default(),
        url: database
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string),
        category_options: select_options(database, CATEGORY_COLUMN),
        account_options: select_options(database, ACCOUNT_COLUMN),
    }
}
