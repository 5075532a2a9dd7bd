//! DynamoDB-backed score store.
//!
//! Table schema: `game_id` (partition key, S) + `sort_key` (range key, S),
//! remaining attributes flat on the item. Reads are a single `Query` with a
//! `begins_with` sort-key condition — no secondary index, no scan.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use tracing::debug;

use super::{ScanDirection, ScoreQuery, ScoreStore, StoreError, StoredScore};

/// Production `ScoreStore` adapter.
///
/// Note: DynamoDB keys items by the full `(game_id, sort_key)` pair, so two
/// submissions with an equal score in the same game collapse into one item
/// (last write wins). The idealized duplicate-tolerant contract holds for
/// distinct scores; equal-score ties need the key-design extension
/// (timestamp suffix) that is out of scope here.
pub struct DynamoDbScoreStore {
    client: Client,
    table_name: String,
}

impl DynamoDbScoreStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a store from ambient AWS configuration (environment, profile,
    /// or task role credentials).
    pub async fn from_env(table_name: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&aws_config), table_name)
    }
}

#[async_trait]
impl ScoreStore for DynamoDbScoreStore {
    async fn put(&self, item: StoredScore) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("game_id", AttributeValue::S(item.game_id))
            .item("sort_key", AttributeValue::S(item.sort_key))
            .item("label", AttributeValue::S(item.label))
            .item("label_type", AttributeValue::S(item.label_type))
            .item("score", AttributeValue::N(item.score.to_string()))
            .item("score_type", AttributeValue::S(item.score_type))
            .item("timestamp", AttributeValue::S(item.timestamp))
            .send()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(())
    }

    async fn query(&self, query: ScoreQuery) -> Result<Vec<StoredScore>, StoreError> {
        debug!(
            game_id = %query.game_id,
            prefix = %query.sort_key_prefix,
            limit = query.limit,
            "querying leaderboard partition"
        );
        let mut request = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("game_id = :game_id AND begins_with(sort_key, :prefix)")
            .expression_attribute_values(":game_id", AttributeValue::S(query.game_id.clone()))
            .expression_attribute_values(":prefix", AttributeValue::S(query.sort_key_prefix))
            .scan_index_forward(query.direction == ScanDirection::Ascending)
            .limit(query.limit as i32);
        if let Some(start) = query.start_after {
            request = request
                .exclusive_start_key("game_id", AttributeValue::S(query.game_id))
                .exclusive_start_key("sort_key", AttributeValue::S(start));
        }
        let response = request
            .send()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(response.items().iter().map(stored_score_from_item).collect())
    }
}

/// Rebuild a [`StoredScore`] from raw attributes. Missing or mistyped
/// attributes degrade to empty/zero values; the planner's sort-key parse
/// rejects such items downstream instead of failing the whole query here.
fn stored_score_from_item(item: &HashMap<String, AttributeValue>) -> StoredScore {
    StoredScore {
        game_id: string_attr(item, "game_id"),
        sort_key: string_attr(item, "sort_key"),
        label: string_attr(item, "label"),
        label_type: string_attr(item, "label_type"),
        score: number_attr(item, "score"),
        score_type: string_attr(item, "score_type"),
        timestamp: string_attr(item, "timestamp"),
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .unwrap_or_default()
}

fn number_attr(item: &HashMap<String, AttributeValue>, name: &str) -> f64 {
    item.get(name)
        .and_then(|value| value.as_n().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}
