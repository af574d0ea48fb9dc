use serde::{Deserialize, Serialize};

/// Default title for a newly provisioned transactions table.
pub const DEFAULT_TABLE_TITLE: &str = "Avery Transactions";

/// Column used as the idempotency key for destination rows.
pub const TRANSACTION_ID_COLUMN: &str = "Transaction ID";

/// Longest transaction id the key column can hold without truncation.
pub const MAX_TRANSACTION_ID_CHARS: usize = 2000;

pub const NAME_COLUMN: &str = "Name";
pub const DATE_COLUMN: &str = "Date";
pub const AMOUNT_COLUMN: &str = "Amount";
pub const CATEGORY_COLUMN: &str = "Category";
pub const ACCOUNT_COLUMN: &str = "Account";
pub const MERCHANT_COLUMN: &str = "Merchant";
pub const STATUS_COLUMN: &str = "Status";
pub const NOTES_COLUMN: &str = "Notes";

/// Typed column kinds supported by the destination store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Title,
    Date,
    Number,
    /// Open select; options accrue as rows are written.
    Select,
    /// Select restricted to a closed set of options.
    ClosedSelect(&'static [&'static str]),
    RichText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Fixed schema of the transactions table. Declared once at creation.
pub const TRANSACTION_TABLE_COLUMNS: [ColumnSpec; 9] = [
    ColumnSpec {
        name: NAME_COLUMN,
        kind: ColumnKind::Title,
    },
    ColumnSpec {
        name: DATE_COLUMN,
        kind: ColumnKind::Date,
    },
    ColumnSpec {
        name: AMOUNT_COLUMN,
        kind: ColumnKind::Number,
    },
    ColumnSpec {
        name: CATEGORY_COLUMN,
        kind: ColumnKind::Select,
    },
    ColumnSpec {
        name: ACCOUNT_COLUMN,
        kind: ColumnKind::Select,
    },
    ColumnSpec {
        name: MERCHANT_COLUMN,
        kind: ColumnKind::RichText,
    },
    ColumnSpec {
        name: STATUS_COLUMN,
        kind: ColumnKind::ClosedSelect(&["posted", "pending"]),
    },
    ColumnSpec {
        name: TRANSACTION_ID_COLUMN,
        kind: ColumnKind::RichText,
    },
    ColumnSpec {
        name: NOTES_COLUMN,
        kind: ColumnKind::RichText,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableHandle {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowHandle {
    pub id: String,
}

/// Live metadata of a destination table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    /// Options already defined on the Category select.
    pub category_options: Vec<String>,
    /// Options already defined on the Account select.
    pub account_options: Vec<String>,
}

/// A workspace page that can parent a new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub object: String,
    pub title: String,
    pub url: Option<String>,
}
