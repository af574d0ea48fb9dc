//! HTTP adapters for the transaction feed and the Notion destination.
//!
//! Each remote service gets its own [`Pacer`]; every attempt, retries
//! included, waits on it before going out.

pub mod avery;
pub mod client;
pub mod error;
pub mod notion;
pub mod pacer;
pub mod pagination;
pub mod retry;

#[cfg(test)]
mod test_support;

pub use avery::{AveryClient, DEFAULT_AVERY_BASE_URL};
pub use client::RemoteClient;
pub use error::{RemoteError, Result, RetryClass};
pub use notion::{NotionClient, DEFAULT_NOTION_BASE_URL};
pub use pacer::{Pacer, DEFAULT_MIN_INTERVAL};
pub use retry::RetryPolicy;
