//! Leaderboard service: score submission and the ranking query planner.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::codec::sort_key;
use crate::config::QueryConfig;
use crate::domain::models::{
    normalize_game_id, HealthStatus, LabelType, LeaderboardEntry, LeaderboardPage,
    LeaderboardRequest, RankingDirection, ScoreRecord, ScoreSubmission, ScoreType,
};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{ScanDirection, ScoreQuery, ScoreStore, StoredScore};
use crate::services::cursor::PageCursor;

/// Stateless service over a [`ScoreStore`]. Every call is an independent
/// unit of work; no state is shared across invocations.
pub struct LeaderboardService<S> {
    store: S,
    limits: QueryConfig,
}

impl<S: ScoreStore> LeaderboardService<S> {
    pub fn new(store: S, limits: QueryConfig) -> Self {
        Self { store, limits }
    }

    pub fn health_check(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            service: "leaderboard".to_string(),
        }
    }

    /// Validate a submission and persist it as a single atomic item.
    ///
    /// Validation failures, including fixed-width encoding overflow, are
    /// reported before any store call — there are no partial writes.
    pub async fn submit_score(&self, submission: ScoreSubmission) -> ServiceResult<ScoreRecord> {
        let record = ScoreRecord::from_submission(submission)?;
        info!(
            game_id = %record.game_id,
            score_type = record.score_type.as_str(),
            score = record.score,
            "score submission received"
        );
        self.store.put(StoredScore::from(&record)).await?;
        info!(game_id = %record.game_id, sort_key = %record.sort_key, "score submitted");
        Ok(record)
    }

    /// Serve one ranked leaderboard page with a single range query.
    ///
    /// The codec guarantees lexicographic order equals numeric order, so the
    /// resolved scan direction yields the ranked sequence directly — no
    /// client-side re-sort, no full-partition fetch. Ranks are 1-based
    /// positions in that sequence, continued across pages via the cursor.
    pub async fn get_leaderboard(&self, request: LeaderboardRequest) -> ServiceResult<LeaderboardPage> {
        let game_id = normalize_game_id(&request.game_id)?;
        let limit = self.resolve_limit(request.limit)?;
        let cursor = request
            .cursor
            .as_deref()
            .map(PageCursor::decode)
            .transpose()?;

        let query = ScoreQuery {
            game_id: game_id.clone(),
            sort_key_prefix: sort_key::prefix(request.score_type),
            direction: scan_direction(request.score_type, request.direction),
            limit,
            start_after: cursor.as_ref().map(|c| c.last_sort_key.clone()),
        };
        let items = self.store.query(query).await?;

        let fetched = items.len() as u32;
        let last_fetched_key = items.last().map(|item| item.sort_key.clone());
        let start_rank = cursor.map_or(1, |c| c.last_rank + 1);

        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(items.len());
        for item in items {
            let rank = start_rank + entries.len() as u32;
            if let Some(entry) = ranked_entry(&game_id, request.score_type, item, rank) {
                entries.push(entry);
            }
        }

        info!(
            game_id = %game_id,
            score_type = request.score_type.as_str(),
            entries = entries.len(),
            "leaderboard retrieved"
        );

        // A full page from the store means the range may continue; the
        // cursor restarts after the last fetched key even when trailing
        // items were skipped as corrupt.
        let next_cursor = match (fetched == limit, last_fetched_key) {
            (true, Some(last_sort_key)) => Some(
                PageCursor {
                    last_sort_key,
                    last_rank: start_rank + entries.len() as u32 - 1,
                }
                .encode(),
            ),
            _ => None,
        };

        Ok(LeaderboardPage {
            game_id,
            score_type: request.score_type,
            direction: request.direction,
            entries,
            next_cursor,
        })
    }

    fn resolve_limit(&self, requested: Option<u32>) -> ServiceResult<u32> {
        match requested {
            None => Ok(self.limits.default_limit),
            Some(limit) if (1..=self.limits.max_limit).contains(&limit) => Ok(limit),
            Some(limit) => Err(ServiceError::Validation(format!(
                "limit must be between 1 and {}, got {limit}",
                self.limits.max_limit
            ))),
        }
    }
}

/// Turn one stored item into a ranked entry, or skip it with a warning
/// signal when it cannot be trusted (corrupt or foreign data).
fn ranked_entry(
    game_id: &str,
    requested: ScoreType,
    item: StoredScore,
    rank: u32,
) -> Option<LeaderboardEntry> {
    match sort_key::parse(&item.sort_key) {
        Ok(parsed) if parsed.score_type == requested => {}
        Ok(_) => {
            warn!(game_id, sort_key = %item.sort_key, "prefix scan returned foreign score type, skipping item");
            return None;
        }
        Err(err) => {
            warn!(game_id, sort_key = %item.sort_key, error = %err, "skipping item with malformed sort key");
            return None;
        }
    }
    let Ok(timestamp) = DateTime::parse_from_rfc3339(&item.timestamp) else {
        warn!(game_id, sort_key = %item.sort_key, "skipping item with unreadable timestamp");
        return None;
    };
    let label_type = LabelType::from_token(&item.label_type).unwrap_or_default();
    Some(LeaderboardEntry {
        rank,
        label: item.label,
        label_type,
        score: item.score,
        timestamp: timestamp.with_timezone(&Utc),
    })
}

/// Resolve the store scan order for a ranking request.
///
/// The caller supplies the ranking direction; the planner combines it with
/// the score type's canonical better-is direction. `BEST_FIRST` points walk
/// the partition descending (highest first); `BEST_FIRST` elapsed time
/// walks ascending (fastest first); `WORST_FIRST` mirrors both.
fn scan_direction(score_type: ScoreType, direction: RankingDirection) -> ScanDirection {
    match (direction, score_type.lower_is_better()) {
        (RankingDirection::BestFirst, false) => ScanDirection::Descending,
        (RankingDirection::BestFirst, true) => ScanDirection::Ascending,
        (RankingDirection::WorstFirst, false) => ScanDirection::Ascending,
        (RankingDirection::WorstFirst, true) => ScanDirection::Descending,
    }
}
