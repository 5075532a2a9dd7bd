//! Persistence abstraction over the partitioned key-value store.
//!
//! The store knows nothing about ranking: it persists opaque items keyed by
//! `(game_id, sort_key)` and answers ordered range scans over the sort key.
//! Everything ranking-shaped lives in the planner on top.

pub mod dynamodb;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::models::ScoreRecord;

pub use dynamodb::DynamoDbScoreStore;
pub use memory::InMemoryScoreStore;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The store call failed or timed out. Retryable by the caller; the
    /// adapter itself performs no retries.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Traversal order over the byte-lexicographic sort-key range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    Ascending,
    Descending,
}

/// One range query against a single game partition.
#[derive(Debug, Clone)]
pub struct ScoreQuery {
    pub game_id: String,
    /// Sort-key prefix selecting one score type, e.g. `POINTS#`.
    pub sort_key_prefix: String,
    pub direction: ScanDirection,
    /// Maximum number of items to return.
    pub limit: u32,
    /// Exclusive restart position: the sort key of the last item the
    /// previous page fetched. `None` starts from the edge of the range.
    pub start_after: Option<String>,
}

/// Persisted item shape, one item per submission.
///
/// Enum-valued fields stay strings here on purpose: the planner parses them
/// on read so that a corrupt or foreign item is a per-item skip rather than
/// a failed query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredScore {
    pub game_id: String,
    pub sort_key: String,
    pub label: String,
    pub label_type: String,
    pub score: f64,
    pub score_type: String,
    pub timestamp: String,
}

impl From<&ScoreRecord> for StoredScore {
    fn from(record: &ScoreRecord) -> Self {
        Self {
            game_id: record.game_id.clone(),
            sort_key: record.sort_key.clone(),
            label: record.label.clone(),
            label_type: record.label_type.as_str().to_string(),
            score: record.score,
            score_type: record.score_type.as_str().to_string(),
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

/// Atomic `put`/`query` access to the score store.
///
/// Both operations are individually atomic and consistent, but there is no
/// cross-operation transaction: a query immediately following a put is not
/// guaranteed to observe the written item (the store's eventual-consistency
/// contract). Duplicate sort keys are legal — equal scores are independent
/// items — and implementations must tolerate them. Timeouts and retries
/// against the backing store belong to the adapter and surface here only as
/// [`StoreError::Unavailable`].
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persist one submission as a single item.
    async fn put(&self, item: StoredScore) -> Result<(), StoreError>;

    /// Ordered range scan: partition key plus sort-key prefix, with scan
    /// direction and result limit. No secondary index is used or required.
    async fn query(&self, query: ScoreQuery) -> Result<Vec<StoredScore>, StoreError>;
}

#[async_trait]
impl<T: ScoreStore + ?Sized> ScoreStore for Arc<T> {
    async fn put(&self, item: StoredScore) -> Result<(), StoreError> {
        (**self).put(item).await
    }

    async fn query(&self, query: ScoreQuery) -> Result<Vec<StoredScore>, StoreError> {
        (**self).query(query).await
    }
}
