//! Bounded page-by-page scan of a timeframe leaderboard.
//!
//! Pages are walked in server order, `1..=max_pages`, one request at a time.
//! The scan stops at the first page containing the user, or at the first
//! page without rows (the leaderboard is exhausted). Pages are not assumed to
//! be sorted by handle, so there is no shortcut past a linear walk.

use serde_json::Value;
use zamarank_core::Timeframe;

use crate::client::ZamaClient;
use crate::error::ZamaError;
use crate::matcher::find_in_rows;
use crate::types::{LeaderboardRow, PageShape};

impl ZamaClient {
    /// Finds `handle` on the `timeframe` leaderboard, scanning at most the
    /// client's configured page limit.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ZamaError`] from any page fetch.
    pub async fn find_user_in_timeframe(
        &self,
        timeframe: Timeframe,
        handle: &str,
    ) -> Result<Option<LeaderboardRow>, ZamaError> {
        let base_url = self.timeframe_base_url(timeframe);
        let found = self
            .find_user_in_pages(&base_url, handle, self.max_pages)
            .await?;
        tracing::debug!(
            timeframe = %timeframe,
            handle,
            found = found.is_some(),
            "timeframe search finished"
        );
        Ok(found)
    }

    /// Scans `base_url + page` for `page` in `1..=max_pages`.
    ///
    /// Returns `Ok(None)` on the first page with no rows, or when every page
    /// up to `max_pages` was scanned without a match.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ZamaError`] from any page fetch. Later pages are
    /// not requested after a failure.
    pub async fn find_user_in_pages(
        &self,
        base_url: &str,
        handle: &str,
        max_pages: u32,
    ) -> Result<Option<LeaderboardRow>, ZamaError> {
        for page in 1..=max_pages {
            let url = format!("{base_url}{page}");
            let body = self.fetch_json(&url).await?;
            let shape = PageShape::classify(&body);

            if page == 1 {
                log_first_page(&url, &body, shape);
            }

            let rows = shape.rows();
            if rows.is_empty() {
                tracing::trace!(url = %url, page, "leaderboard exhausted");
                return Ok(None);
            }

            if let Some(row) = find_in_rows(rows, handle) {
                tracing::trace!(url = %url, page, rank = ?row.rank, "user found");
                return Ok(Some(row));
            }
        }

        tracing::trace!(base_url, max_pages, "page limit reached without a match");
        Ok(None)
    }
}

/// Records the layout of the first page so upstream schema drift is visible
/// with `RUST_LOG=zamarank_client=debug`.
fn log_first_page(url: &str, body: &Value, shape: PageShape<'_>) {
    let first_entry = shape.rows().first().unwrap_or(&Value::Null);
    tracing::debug!(
        url,
        shape = shape.label(),
        top_level_keys = ?top_level_keys(body),
        first_entry = %first_entry,
        "timeframe page 1 layout"
    );
}

fn top_level_keys(body: &Value) -> Vec<&str> {
    body.as_object()
        .map(|object| object.keys().map(String::as_str).collect())
        .unwrap_or_default()
}
