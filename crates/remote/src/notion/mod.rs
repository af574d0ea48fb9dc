//! Tabular store adapter backed by a Notion database.

mod client;
mod properties;
mod schema;

pub use client::{NotionClient, DEFAULT_NOTION_BASE_URL, NOTION_VERSION};
pub use properties::{new_row_properties, row_properties, MAX_TEXT_CHARS};
pub use schema::database_properties;
