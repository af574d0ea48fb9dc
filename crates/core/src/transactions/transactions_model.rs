use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement state reported by the transaction feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Posted,
    Pending,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posted => "posted",
            Self::Pending => "pending",
        }
    }

    /// Lenient parse of a feed status. Anything other than "pending" is posted.
    pub fn from_feed(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("pending") => Self::Pending,
            _ => Self::Posted,
        }
    }
}

/// Snapshot of a transaction fetched from the source for one run.
///
/// `avery_category` is never set by the feed; it is assigned by
/// [`crate::categories::categorize`] before the row is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub memo: Option<String>,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub account_name: Option<String>,
    pub institution_name: Option<String>,
    pub status: TransactionStatus,
    #[serde(rename = "avery_category")]
    pub avery_category: Option<String>,
}

impl Transaction {
    /// First non-blank of description, merchant and memo, in that order.
    ///
    /// A whitespace-only field counts as absent, the same as an empty one.
    /// The feed adapter already maps such values to `None`, so this only
    /// matters for transactions built elsewhere.
    pub fn display_text(&self) -> Option<&str> {
        [&self.description, &self.merchant, &self.memo]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn transaction() -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            description: None,
            merchant: None,
            memo: None,
            amount: dec!(-4.50),
            date: None,
            account_name: None,
            institution_name: None,
            status: TransactionStatus::Posted,
            avery_category: None,
        }
    }

    #[test]
    fn display_text_prefers_description_then_merchant_then_memo() {
        let mut tx = transaction();
        tx.memo = Some("memo".to_string());
        assert_eq!(tx.display_text(), Some("memo"));

        tx.merchant = Some("Merchant".to_string());
        assert_eq!(tx.display_text(), Some("Merchant"));

        tx.description = Some("  ".to_string());
        assert_eq!(tx.display_text(), Some("Merchant"));

        tx.description = Some("Description".to_string());
        assert_eq!(tx.display_text(), Some("Description"));
    }

    #[test]
    fn feed_status_is_lenient() {
        assert_eq!(
            TransactionStatus::from_feed(Some("PENDING")),
            TransactionStatus::Pending
        );
        assert_eq!(
            TransactionStatus::from_feed(Some("booked")),
            TransactionStatus::Posted
        );
        assert_eq!(TransactionStatus::from_feed(None), TransactionStatus::Posted);
    }
}
