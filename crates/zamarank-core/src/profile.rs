//! The normalized profile record returned by `/zama/{handle}` and consumed by
//! the card renderer.
//!
//! Field names serialize in camelCase to match the public JSON shape:
//!
//! ```json
//! {
//!   "handle": "@bob",
//!   "displayName": "Bob",
//!   "avatar": null,
//!   "seasons": { "s1": 5, "s2": null, "s3": null, "s4": null },
//!   "s5": { "rank24h": null, "rank7d": null, "rank30d": null,
//!           "mindshare24h": null, "mindshare7d": null, "mindshare30d": null },
//!   "status": "ok"
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Historical season keys recognized in the seasonal-search response.
pub const SEASON_KEYS: [&str; 4] = ["s1", "s2", "s3", "s4"];

/// Leaderboard window for the live season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Day,
    Week,
    Month,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Day, Timeframe::Week, Timeframe::Month];

    /// Value of the upstream `timeframe` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Day => "24h",
            Timeframe::Week => "7d",
            Timeframe::Month => "30d",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranks for the four finished seasons. Every key starts out `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonsMap {
    pub s1: Option<i64>,
    pub s2: Option<i64>,
    pub s3: Option<i64>,
    pub s4: Option<i64>,
}

impl SeasonsMap {
    /// Sets the rank for `key` if it names a recognized season.
    ///
    /// Returns `false` (and leaves the map untouched) for unknown keys.
    pub fn set(&mut self, key: &str, rank: Option<i64>) -> bool {
        let slot = SEASON_KEYS
            .iter()
            .zip(self.slots_mut())
            .find_map(|(k, slot)| (*k == key).then_some(slot));
        match slot {
            Some(slot) => {
                *slot = rank;
                true
            }
            None => false,
        }
    }

    /// Pairs of `(key, rank)` in season order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Option<i64>); 4] {
        let ranks = [self.s1, self.s2, self.s3, self.s4];
        std::array::from_fn(|i| (SEASON_KEYS[i], ranks[i]))
    }

    fn slots_mut(&mut self) -> [&mut Option<i64>; 4] {
        [&mut self.s1, &mut self.s2, &mut self.s3, &mut self.s4]
    }
}

/// Live-season (s5) rank and mindshare per timeframe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentSeason {
    #[serde(rename = "rank24h")]
    pub rank_24h: Option<i64>,
    #[serde(rename = "rank7d")]
    pub rank_7d: Option<i64>,
    #[serde(rename = "rank30d")]
    pub rank_30d: Option<i64>,
    #[serde(rename = "mindshare24h")]
    pub mindshare_24h: Option<f64>,
    #[serde(rename = "mindshare7d")]
    pub mindshare_7d: Option<f64>,
    #[serde(rename = "mindshare30d")]
    pub mindshare_30d: Option<f64>,
}

impl CurrentSeason {
    /// Records the rank and mindshare found for one timeframe.
    pub fn set(&mut self, timeframe: Timeframe, rank: Option<i64>, mindshare: Option<f64>) {
        let (rank_slot, mindshare_slot) = match timeframe {
            Timeframe::Day => (&mut self.rank_24h, &mut self.mindshare_24h),
            Timeframe::Week => (&mut self.rank_7d, &mut self.mindshare_7d),
            Timeframe::Month => (&mut self.rank_30d, &mut self.mindshare_30d),
        };
        *rank_slot = rank;
        *mindshare_slot = mindshare;
    }

    /// Rank and mindshare recorded for `timeframe`.
    #[must_use]
    pub fn get(&self, timeframe: Timeframe) -> (Option<i64>, Option<f64>) {
        match timeframe {
            Timeframe::Day => (self.rank_24h, self.mindshare_24h),
            Timeframe::Week => (self.rank_7d, self.mindshare_7d),
            Timeframe::Month => (self.rank_30d, self.mindshare_30d),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Ok,
    NotRanked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
    pub handle: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub seasons: SeasonsMap,
    pub s5: CurrentSeason,
    pub status: ProfileStatus,
}
