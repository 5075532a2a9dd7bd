//! In-memory score store for tests and local development.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{ScanDirection, ScoreQuery, ScoreStore, StoreError, StoredScore};

/// Items of one game partition, ordered by sort key. Each sort key holds a
/// bucket so duplicate scores stay independent items; bucket order is
/// insertion order, which keeps tie ordering store-defined.
type Partition = BTreeMap<String, Vec<StoredScore>>;

/// `ScoreStore` backed by ordered maps. A `BTreeMap` iterates its string
/// keys in byte-lexicographic order, so scans here observe exactly the
/// ordering contract the production store provides.
#[derive(Default)]
pub struct InMemoryScoreStore {
    partitions: RwLock<HashMap<String, Partition>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn put(&self, item: StoredScore) -> Result<(), StoreError> {
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(item.game_id.clone())
            .or_default()
            .entry(item.sort_key.clone())
            .or_default()
            .push(item);
        Ok(())
    }

    async fn query(&self, query: ScoreQuery) -> Result<Vec<StoredScore>, StoreError> {
        let partitions = self.partitions.read().await;
        let Some(partition) = partitions.get(&query.game_id) else {
            return Ok(Vec::new());
        };
        let mut matches: Vec<StoredScore> = partition
            .iter()
            .filter(|(sort_key, _)| sort_key.starts_with(&query.sort_key_prefix))
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect();
        if query.direction == ScanDirection::Descending {
            matches.reverse();
        }
        let items = matches
            .into_iter()
            .filter(|item| match (&query.start_after, query.direction) {
                (Some(start), ScanDirection::Ascending) => item.sort_key.as_str() > start.as_str(),
                (Some(start), ScanDirection::Descending) => item.sort_key.as_str() < start.as_str(),
                (None, _) => true,
            })
            .take(query.limit as usize)
            .collect();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(game_id: &str, sort_key: &str, label: &str) -> StoredScore {
        StoredScore {
            game_id: game_id.to_string(),
            sort_key: sort_key.to_string(),
            label: label.to_string(),
            label_type: "CUSTOM".to_string(),
            score: 0.0,
            score_type: "POINTS".to_string(),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn query(game_id: &str, direction: ScanDirection, limit: u32) -> ScoreQuery {
        ScoreQuery {
            game_id: game_id.to_string(),
            sort_key_prefix: "POINTS#".to_string(),
            direction,
            limit,
            start_after: None,
        }
    }

    #[tokio::test]
    async fn test_scan_follows_byte_order() {
        let store = InMemoryScoreStore::new();
        store.put(item("g1", "POINTS#000000200.000", "b")).await.unwrap();
        store.put(item("g1", "POINTS#000000100.000", "a")).await.unwrap();
        store.put(item("g1", "POINTS#000000300.000", "c")).await.unwrap();

        let ascending = store.query(query("g1", ScanDirection::Ascending, 10)).await.unwrap();
        let labels: Vec<&str> = ascending.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);

        let descending = store.query(query("g1", ScanDirection::Descending, 10)).await.unwrap();
        let labels: Vec<&str> = descending.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_prefix_filters_foreign_score_types() {
        let store = InMemoryScoreStore::new();
        store.put(item("g1", "POINTS#000000100.000", "points")).await.unwrap();
        store
            .put(item("g1", "TIME_IN_MILLISECONDS#000000100.000", "time"))
            .await
            .unwrap();

        let items = store.query(query("g1", ScanDirection::Ascending, 10)).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "points");
    }

    #[tokio::test]
    async fn test_duplicate_sort_keys_are_kept() {
        let store = InMemoryScoreStore::new();
        store.put(item("g1", "POINTS#000000100.000", "first")).await.unwrap();
        store.put(item("g1", "POINTS#000000100.000", "second")).await.unwrap();

        let items = store.query(query("g1", ScanDirection::Ascending, 10)).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_limit_and_start_after() {
        let store = InMemoryScoreStore::new();
        for (key, label) in [
            ("POINTS#000000100.000", "a"),
            ("POINTS#000000200.000", "b"),
            ("POINTS#000000300.000", "c"),
        ] {
            store.put(item("g1", key, label)).await.unwrap();
        }

        let mut q = query("g1", ScanDirection::Descending, 2);
        let page = store.query(q.clone()).await.unwrap();
        let labels: Vec<&str> = page.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["c", "b"]);

        q.start_after = Some(page.last().unwrap().sort_key.clone());
        let page = store.query(q).await.unwrap();
        let labels: Vec<&str> = page.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["a"]);
    }

    #[tokio::test]
    async fn test_unknown_partition_is_empty() {
        let store = InMemoryScoreStore::new();
        let items = store.query(query("missing", ScanDirection::Ascending, 10)).await.unwrap();
        assert!(items.is_empty());
    }
}
