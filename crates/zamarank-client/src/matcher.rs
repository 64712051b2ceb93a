//! Locates a user's row within one leaderboard page.

use serde_json::Value;

use crate::types::LeaderboardRow;

/// Row fields that may carry the user's handle, in lookup order. The first
/// non-empty string wins.
pub const HANDLE_FIELDS: [&str; 3] = ["handle", "username", "twitter"];

/// Returns the handle-like string of a row, or `""` when none of
/// [`HANDLE_FIELDS`] holds a non-empty string.
#[must_use]
pub fn row_handle(row: &Value) -> &str {
    HANDLE_FIELDS
        .iter()
        .find_map(|field| {
            row.get(*field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("")
}

/// Lowercased handle with a single leading `@` removed.
fn comparable(handle: &str) -> String {
    let lowered = handle.to_lowercase();
    match lowered.strip_prefix('@') {
        Some(rest) => rest.to_owned(),
        None => lowered,
    }
}

/// Finds the row whose handle matches `handle`, ignoring case and a leading
/// `@` on either side.
///
/// Returns `None` when `rows` is not an array. `null` and non-object rows are
/// skipped. The first matching row in page order wins. An empty `handle`
/// matches a row that carries no handle-like field.
#[must_use]
pub fn find_user_row(rows: &Value, handle: &str) -> Option<LeaderboardRow> {
    find_in_rows(rows.as_array()?, handle)
}

/// Slice form of [`find_user_row`].
#[must_use]
pub fn find_in_rows(rows: &[Value], handle: &str) -> Option<LeaderboardRow> {
    let target = comparable(handle);
    rows.iter()
        .filter(|row| row.is_object())
        .find(|row| comparable(row_handle(row)) == target)
        .and_then(LeaderboardRow::from_value)
}
