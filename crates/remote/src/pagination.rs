//! Cursor pagination shared by listing and search calls.

use std::future::Future;

use log::warn;

use crate::error::Result;

/// One page of results plus the cursor for the next page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// Drives `fetch` from the first page until no cursor comes back.
///
/// A cursor that repeats the one just sent ends the loop, since following
/// it would never terminate.
pub async fn collect_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.clone()).await?;
        items.extend(page.items);
        match page.next_cursor.filter(|next| !next.is_empty()) {
            Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                warn!("Remote returned the same cursor twice ({}), stopping", next);
                break;
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use std::sync::Mutex;

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let seen = Mutex::new(Vec::new());
        let items = collect_all(|cursor| {
            seen.lock().unwrap().push(cursor.clone());
            async move {
                Ok(match cursor.as_deref() {
                    None => Page {
                        items: vec![1, 2],
                        next_cursor: Some("c1".to_string()),
                    },
                    Some("c1") => Page {
                        items: vec![3],
                        next_cursor: Some("c2".to_string()),
                    },
                    _ => Page::last(vec![4]),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_cursor_ends_iteration() {
        let items = collect_all(|_| async {
            Ok(Page {
                items: vec!["a"],
                next_cursor: Some(String::new()),
            })
        })
        .await
        .unwrap();
        assert_eq!(items, vec!["a"]);
    }

    #[tokio::test]
    async fn repeated_cursor_does_not_loop_forever() {
        let items = collect_all(|_| async {
            Ok(Page {
                items: vec![0],
                next_cursor: Some("same".to_string()),
            })
        })
        .await
        .unwrap();
        assert_eq!(items, vec![0, 0]);
    }

    #[tokio::test]
    async fn page_error_propagates() {
        let result: Result<Vec<u8>> =
            collect_all(|_| async { Err(RemoteError::api(500, "boom")) }).await;
        assert_eq!(result.unwrap_err().status_code(), Some(500));
    }
}
