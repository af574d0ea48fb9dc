use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, RowWriteFailure};

/// Inclusive calendar window bounding a transaction fetch.
///
/// An omitted bound asks the source for its default. The default window for
/// triggered runs is owned by the trigger, see [`SyncWindow::trailing`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SyncWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        let window = Self { from, to };
        window.validate()?;
        Ok(window)
    }

    /// `days` before `today` through `today`. One day gives yesterday..today.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            from: Some(from),
            to: Some(today),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(Error::invalid_input(format!(
                    "Sync window starts after it ends ({} > {})",
                    from, to
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SyncWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |date: Option<NaiveDate>| {
            date.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "default".to_string())
        };
        write!(f, "{}..{}", bound(self.from), bound(self.to))
    }
}

/// Externally observed outcome of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Rows successfully created or updated.
    pub count: usize,
}

/// Detailed per-run outcome, including the swallowed row failures.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub failures: Vec<RowWriteFailure>,
}

impl SyncReport {
    pub fn count(&self) -> usize {
        self.created + self.updated
    }

    pub fn result(&self) -> SyncResult {
        SyncResult {
            count: self.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RowOperation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn trailing_one_day_is_yesterday_through_today() {
        let window = SyncWindow::trailing(date(2024, 3, 1), 1);
        assert_eq!(window.from, Some(date(2024, 2, 29)));
        assert_eq!(window.to, Some(date(2024, 3, 1)));
        assert_eq!(window.to_string(), "2024-02-29..2024-03-01");
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = SyncWindow::new(Some(date(2024, 3, 2)), Some(date(2024, 3, 1))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn open_bounds_are_valid() {
        let window = SyncWindow::new(None, Some(date(2024, 3, 1))).unwrap();
        assert_eq!(window.to_string(), "default..2024-03-01");
    }

    #[test]
    fn report_count_excludes_failures() {
        let report = SyncReport {
            created: 2,
            updated: 1,
            failures: vec![RowWriteFailure::new(
                "tx",
                RowOperation::Update,
                Error::remote(500, "boom"),
            )],
        };
        assert_eq!(report.result(), SyncResult { count: 3 });
    }
}
