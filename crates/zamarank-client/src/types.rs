//! Typed views over the loosely specified upstream JSON.
//!
//! The upstream endpoints do not publish a schema; fields go missing, change
//! type, or arrive as `null`. Instead of deriving `Deserialize` (which would
//! reject a whole page over one odd row), each type here is extracted from a
//! `serde_json::Value` by an explicit, infallible constructor.

use serde_json::Value;

use crate::matcher::row_handle;

/// Reads a rank that may arrive as an integer, an integral float, or a
/// numeric string.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn value_as_rank(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a mindshare value that may arrive as a number or numeric string.
pub(crate) fn value_as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A string field that is present and non-empty.
fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// One entry of the seasonal-search `results` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonalResult {
    /// `None` when the entry is `null`, not an object, or lacks a usable
    /// `season` string.
    pub season: Option<String>,
    pub rank: Option<i64>,
    /// `true` when the entry carries a non-null `rank` of any type, even one
    /// that does not read as an integer.
    pub has_rank: bool,
}

impl SeasonalResult {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            season: non_empty_str(value, "season").map(str::to_owned),
            rank: value_as_rank(value.get("rank")),
            has_rank: value.get("rank").is_some_and(|rank| !rank.is_null()),
        }
    }
}

/// The seasonal-search document for one handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonalDocument {
    pub handle: Option<String>,
    pub display_name: Option<String>,
    pub profile_pic: Option<String>,
    /// `None` when `results` is missing or not an array.
    pub results: Option<Vec<SeasonalResult>>,
    /// `true` only when `s5.found` is exactly the boolean `true`.
    pub s5_found: bool,
}

impl SeasonalDocument {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let results = value
            .get("results")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(SeasonalResult::from_value).collect());

        let s5_found = value
            .get("s5")
            .and_then(|s5| s5.get("found"))
            .and_then(Value::as_bool)
            == Some(true);

        Self {
            handle: non_empty_str(value, "handle").map(str::to_owned),
            display_name: non_empty_str(value, "displayName").map(str::to_owned),
            profile_pic: non_empty_str(value, "profilePic").map(str::to_owned),
            results,
            s5_found,
        }
    }

    /// Entries of `results`, empty when the list was absent or malformed.
    #[must_use]
    pub fn result_entries(&self) -> &[SeasonalResult] {
        self.results.as_deref().unwrap_or_default()
    }
}

/// One row of a timeframe leaderboard page.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    /// Raw handle-like value (see [`crate::matcher::HANDLE_FIELDS`]); empty
    /// when the row carries none.
    pub handle: String,
    pub rank: Option<i64>,
    pub mindshare: Option<f64>,
}

impl LeaderboardRow {
    /// Returns `None` for `null` and non-object rows.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Some(Self {
            handle: row_handle(value).to_owned(),
            rank: value_as_rank(value.get("rank")),
            mindshare: value_as_f64(value.get("mindshare")),
        })
    }
}

/// How a leaderboard page body carries its rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageShape<'a> {
    /// The body is itself an array of rows.
    Array(&'a [Value]),
    /// The body is an object whose `data` field is an array of rows.
    DataField(&'a [Value]),
    /// Anything else; treated as an exhausted leaderboard.
    Unrecognized,
}

impl<'a> PageShape<'a> {
    #[must_use]
    pub fn classify(body: &'a Value) -> Self {
        if let Some(rows) = body.as_array() {
            return PageShape::Array(rows);
        }
        match body.get("data").and_then(Value::as_array) {
            Some(rows) => PageShape::DataField(rows),
            None => PageShape::Unrecognized,
        }
    }

    #[must_use]
    pub fn rows(self) -> &'a [Value] {
        match self {
            PageShape::Array(rows) | PageShape::DataField(rows) => rows,
            PageShape::Unrecognized => &[],
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PageShape::Array(_) => "array",
            PageShape::DataField(_) => "data_field",
            PageShape::Unrecognized => "unrecognized",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rank_accepts_integers_integral_floats_and_numeric_strings() {
        assert_eq!(value_as_rank(Some(&json!(7))), Some(7));
        assert_eq!(value_as_rank(Some(&json!(7.0))), Some(7));
        assert_eq!(value_as_rank(Some(&json!(" 12 "))), Some(12));
        assert_eq!(value_as_rank(Some(&json!(7.5))), None);
        assert_eq!(value_as_rank(Some(&json!(null))), None);
        assert_eq!(value_as_rank(None), None);
    }

    #[test]
    fn seasonal_result_from_null_entry_is_empty() {
        let entry = SeasonalResult::from_value(&Value::Null);
        assert_eq!(
            entry,
            SeasonalResult {
                season: None,
                rank: None,
                has_rank: false,
            }
        );
    }

    #[test]
    fn seasonal_result_ignores_empty_season() {
        let entry = SeasonalResult::from_value(&json!({"season": "", "rank": 3}));
        assert_eq!(entry.season, None);
        assert_eq!(entry.rank, Some(3));
    }

    #[test]
    fn non_integer_rank_still_counts_as_present() {
        let text = SeasonalResult::from_value(&json!({"season": "s1", "rank": "N/A"}));
        assert_eq!(text.rank, None);
        assert!(text.has_rank);

        let fractional = SeasonalResult::from_value(&json!({"season": "s2", "rank": 12.5}));
        assert_eq!(fractional.rank, None);
        assert!(fractional.has_rank);

        let null = SeasonalResult::from_value(&json!({"season": "s3", "rank": null}));
        assert!(!null.has_rank);
        let missing = SeasonalResult::from_value(&json!({"season": "s4"}));
        assert!(!missing.has_rank);
    }

    #[test]
    fn seasonal_document_reads_profile_fields_and_results() {
        let doc = SeasonalDocument::from_value(&json!({
            "handle": "@bob",
            "displayName": "Bob",
            "profilePic": "",
            "results": [{"season": "S1", "rank": 5}, null],
            "s5": {"found": true}
        }));
        assert_eq!(doc.handle.as_deref(), Some("@bob"));
        assert_eq!(doc.display_name.as_deref(), Some("Bob"));
        assert_eq!(doc.profile_pic, None);
        assert_eq!(doc.result_entries().len(), 2);
        assert_eq!(doc.result_entries()[0].season.as_deref(), Some("S1"));
        assert!(doc.s5_found);
    }

    #[test]
    fn s5_found_requires_boolean_true() {
        let truthy = SeasonalDocument::from_value(&json!({"s5": {"found": "true"}}));
        assert!(!truthy.s5_found);
        let missing = SeasonalDocument::from_value(&json!({"s5": {}}));
        assert!(!missing.s5_found);
    }

    #[test]
    fn results_that_are_not_an_array_are_absent() {
        let doc = SeasonalDocument::from_value(&json!({"results": {"season": "s1"}}));
        assert!(doc.results.is_none());
        assert!(doc.result_entries().is_empty());
    }

    #[test]
    fn leaderboard_row_reads_rank_and_mindshare() {
        let row = LeaderboardRow::from_value(&json!({
            "username": "@alice",
            "rank": 4,
            "mindshare": 2.5
        }))
        .expect("object row");
        assert_eq!(row.handle, "@alice");
        assert_eq!(row.rank, Some(4));
        assert_eq!(row.mindshare, Some(2.5));
    }

    #[test]
    fn leaderboard_row_rejects_non_objects() {
        assert!(LeaderboardRow::from_value(&Value::Null).is_none());
        assert!(LeaderboardRow::from_value(&json!("alice")).is_none());
    }

    #[test]
    fn page_shape_classifies_bare_array() {
        let body = json!([{"handle": "a"}]);
        let shape = PageShape::classify(&body);
        assert!(matches!(shape, PageShape::Array(rows) if rows.len() == 1));
    }

    #[test]
    fn page_shape_classifies_data_field() {
        let body = json!({"data": [{"handle": "a"}, {"handle": "b"}], "page": 1});
        let shape = PageShape::classify(&body);
        assert_eq!(shape.label(), "data_field");
        assert_eq!(shape.rows().len(), 2);
    }

    #[test]
    fn page_shape_other_objects_have_no_rows() {
        let body = json!({"items": [{"handle": "a"}]});
        let shape = PageShape::classify(&body);
        assert_eq!(shape, PageShape::Unrecognized);
        assert!(shape.rows().is_empty());
    }
}
