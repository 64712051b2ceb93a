//! Merges the seasonal-search document with the three live-season
//! leaderboards into one [`NormalizedProfile`].

use zamarank_core::{CurrentSeason, NormalizedProfile, ProfileStatus, SeasonsMap, Timeframe};

use crate::client::ZamaClient;
use crate::error::ZamaError;
use crate::types::{LeaderboardRow, SeasonalDocument};

/// Season ranks from the search document. Unknown season keys are ignored;
/// a later entry for the same season overwrites an earlier one.
#[must_use]
pub fn build_seasons(doc: &SeasonalDocument) -> SeasonsMap {
    let mut seasons = SeasonsMap::default();
    for entry in doc.result_entries() {
        let Some(season) = entry.season.as_deref() else {
            continue;
        };
        if !seasons.set(&season.to_lowercase(), entry.rank) {
            tracing::trace!(season, "ignoring unrecognized season key");
        }
    }
    seasons
}

/// `true` when every entry of `results` has a `null` or missing rank,
/// including when the list is empty or absent. A rank of any other type
/// counts as present.
#[must_use]
pub fn all_season_ranks_null(doc: &SeasonalDocument) -> bool {
    doc.result_entries().iter().all(|entry| !entry.has_rank)
}

/// A user with no past-season rank who is not present in the live season is
/// not ranked anywhere, and the leaderboards need not be scanned.
#[must_use]
pub fn is_unranked(doc: &SeasonalDocument) -> bool {
    all_season_ranks_null(doc) && !doc.s5_found
}

fn assemble(
    doc: &SeasonalDocument,
    handle: &str,
    s5: CurrentSeason,
    status: ProfileStatus,
) -> NormalizedProfile {
    NormalizedProfile {
        handle: doc
            .handle
            .clone()
            .unwrap_or_else(|| format!("@{handle}")),
        display_name: doc
            .display_name
            .clone()
            .unwrap_or_else(|| handle.to_owned()),
        avatar: doc.profile_pic.clone(),
        seasons: build_seasons(doc),
        s5,
        status,
    }
}

/// Profile for a user confirmed absent from every ranking surface.
#[must_use]
pub fn not_ranked_profile(doc: &SeasonalDocument, handle: &str) -> NormalizedProfile {
    assemble(
        doc,
        handle,
        CurrentSeason::default(),
        ProfileStatus::NotRanked,
    )
}

/// Profile built from the search document and the rows found for each of
/// [`Timeframe::ALL`], in that order.
#[must_use]
pub fn ranked_profile(
    doc: &SeasonalDocument,
    handle: &str,
    rows: [Option<LeaderboardRow>; 3],
) -> NormalizedProfile {
    let mut s5 = CurrentSeason::default();
    for (timeframe, row) in Timeframe::ALL.into_iter().zip(rows) {
        if let Some(row) = row {
            s5.set(timeframe, row.rank, row.mindshare);
        }
    }
    assemble(doc, handle, s5, ProfileStatus::Ok)
}

impl ZamaClient {
    /// Fetches and extracts the seasonal-search document for `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`ZamaError`] if the fetch fails or the body is not JSON.
    pub async fn fetch_seasonal(&self, handle: &str) -> Result<SeasonalDocument, ZamaError> {
        let body = self.fetch_json(&self.search_url(handle)).await?;
        Ok(SeasonalDocument::from_value(&body))
    }

    /// Builds the normalized profile for `handle`.
    ///
    /// `handle` is expected in the form produced by
    /// [`zamarank_core::normalize_handle`]. When the user is unranked the
    /// leaderboards are never requested. Otherwise the three timeframe scans
    /// run concurrently and all of them run to completion before the result
    /// is assembled.
    ///
    /// # Errors
    ///
    /// Any fetch or parse failure fails the whole profile; when more than one
    /// timeframe scan fails, the first in 24h/7d/30d order is returned.
    pub async fn build_profile(&self, handle: &str) -> Result<NormalizedProfile, ZamaError> {
        let doc = self.fetch_seasonal(handle).await?;

        if is_unranked(&doc) {
            tracing::info!(handle, "user not ranked; skipping leaderboard scan");
            return Ok(not_ranked_profile(&doc, handle));
        }

        let (day, week, month) = tokio::join!(
            self.find_user_in_timeframe(Timeframe::Day, handle),
            self.find_user_in_timeframe(Timeframe::Week, handle),
            self.find_user_in_timeframe(Timeframe::Month, handle),
        );
        let rows = [day?, week?, month?];

        let profile = ranked_profile(&doc, handle, rows);
        tracing::info!(
            handle,
            found_24h = profile.s5.rank_24h.is_some(),
            found_7d = profile.s5.rank_7d.is_some(),
            found_30d = profile.s5.rank_30d.is_some(),
            "profile assembled"
        );
        Ok(profile)
    }
}
