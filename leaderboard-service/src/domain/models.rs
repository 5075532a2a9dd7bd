use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{self, sort_key};
use crate::error::{ServiceError, ServiceResult};

/// Maximum accepted game identifier length.
pub const MAX_GAME_ID_LENGTH: usize = 50;

/// Maximum accepted display label length.
pub const MAX_LABEL_LENGTH: usize = 32;

/// Required label length when the label type is `INITIALS`.
pub const INITIALS_LENGTH: usize = 3;

/// Unit of a submitted score. The enum is closed: unknown wire values fail
/// deserialization instead of defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreType {
    Points,
    TimeInMilliseconds,
}

impl ScoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreType::Points => "POINTS",
            ScoreType::TimeInMilliseconds => "TIME_IN_MILLISECONDS",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "POINTS" => Some(ScoreType::Points),
            "TIME_IN_MILLISECONDS" => Some(ScoreType::TimeInMilliseconds),
            _ => None,
        }
    }

    /// Whether a lower value beats a higher one for this unit: elapsed time
    /// canonically prizes speed, points prize magnitude. A time leaderboard
    /// that rewards endurance instead requests `WORST_FIRST`.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, ScoreType::TimeInMilliseconds)
    }
}

/// Kind of display identity attached to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelType {
    Initials,
    Username,
    TeamName,
    Custom,
}

impl Default for LabelType {
    fn default() -> Self {
        LabelType::Custom
    }
}

impl LabelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelType::Initials => "INITIALS",
            LabelType::Username => "USERNAME",
            LabelType::TeamName => "TEAM_NAME",
            LabelType::Custom => "CUSTOM",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "INITIALS" => Some(LabelType::Initials),
            "USERNAME" => Some(LabelType::Username),
            "TEAM_NAME" => Some(LabelType::TeamName),
            "CUSTOM" => Some(LabelType::Custom),
            _ => None,
        }
    }
}

/// Caller-chosen ranking direction, independent of score type. `BEST_FIRST`
/// is relative to the score type's canonical better-is direction; see
/// [`ScoreType::lower_is_better`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankingDirection {
    BestFirst,
    WorstFirst,
}

/// A score submission as received from the request dispatcher.
///
/// Construction through [`ScoreSubmission::new`] validates eagerly; a
/// submission deserialized from the wire is validated when the record is
/// created from it. There is no mutation path after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub game_id: String,
    pub label: String,
    #[serde(default)]
    pub label_type: LabelType,
    pub score: f64,
    pub score_type: ScoreType,
}

impl ScoreSubmission {
    pub fn new(
        game_id: impl Into<String>,
        label: impl Into<String>,
        label_type: LabelType,
        score: f64,
        score_type: ScoreType,
    ) -> ServiceResult<Self> {
        Self {
            game_id: game_id.into(),
            label: label.into(),
            label_type,
            score,
            score_type,
        }
        .into_validated()
    }

    /// Validate every field and return the normalized submission.
    pub fn into_validated(mut self) -> ServiceResult<Self> {
        self.game_id = normalize_game_id(&self.game_id)?;
        self.label = normalize_label(&self.label)?;
        if self.label_type == LabelType::Initials {
            if self.label.chars().count() != INITIALS_LENGTH {
                return Err(ServiceError::Validation(format!(
                    "label must be exactly {INITIALS_LENGTH} characters when label_type is INITIALS"
                )));
            }
            if !self.label.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ServiceError::Validation(
                    "initials must contain only alphanumeric characters".to_string(),
                ));
            }
        }
        if !self.score.is_finite() {
            return Err(ServiceError::Validation(
                "score must be a finite number".to_string(),
            ));
        }
        if self.score < 0.0 {
            return Err(ServiceError::Validation(format!(
                "score must be non-negative, got {}",
                self.score
            )));
        }
        Ok(self)
    }
}

/// Normalize and validate a game identifier: trimmed, lowercased, 1 to
/// [`MAX_GAME_ID_LENGTH`] characters of ASCII alphanumerics, `-` and `_`.
pub fn normalize_game_id(raw: &str) -> ServiceResult<String> {
    let game_id = raw.trim().to_lowercase();
    if game_id.is_empty() {
        return Err(ServiceError::Validation(
            "game_id must not be empty".to_string(),
        ));
    }
    if game_id.chars().count() > MAX_GAME_ID_LENGTH {
        return Err(ServiceError::Validation(format!(
            "game_id must be at most {MAX_GAME_ID_LENGTH} characters"
        )));
    }
    if !game_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ServiceError::Validation(
            "game_id must contain only alphanumeric characters, hyphens, and underscores".to_string(),
        ));
    }
    Ok(game_id)
}

fn normalize_label(raw: &str) -> ServiceResult<String> {
    let label: String = raw.chars().filter(|c| !c.is_control()).collect();
    let label = label.trim().to_string();
    if label.is_empty() {
        return Err(ServiceError::Validation(
            "label must not be empty".to_string(),
        ));
    }
    if label.chars().count() > MAX_LABEL_LENGTH {
        return Err(ServiceError::Validation(format!(
            "label must be at most {MAX_LABEL_LENGTH} characters"
        )));
    }
    Ok(label)
}

/// One leaderboard entry as persisted. Immutable once created: a new
/// submission is always a new independent record, and nothing in scope
/// updates or deletes existing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub game_id: String,
    /// Derived `{score_type}#{encoded_score}` key; a pure function of
    /// `(score_type, score)` and never set by callers.
    pub sort_key: String,
    pub label: String,
    pub label_type: LabelType,
    pub score: f64,
    pub score_type: ScoreType,
    /// Assigned by the model at creation, not by the caller, so client
    /// clock skew never leaks into stored data. Informational only — the
    /// timestamp is not part of the sort key.
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    /// Validate a submission and derive the stored record from it.
    ///
    /// Encoding overflow is caught here, before any store call.
    pub fn from_submission(submission: ScoreSubmission) -> ServiceResult<Self> {
        let submission = submission.into_validated()?;
        let encoded = codec::encode(submission.score)?;
        let sort_key = sort_key::build(submission.score_type, &encoded);
        Ok(Self {
            game_id: submission.game_id,
            sort_key,
            label: submission.label,
            label_type: submission.label_type,
            score: submission.score,
            score_type: submission.score_type,
            timestamp: Utc::now(),
        })
    }
}

/// A ranked entry in a leaderboard response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position within the ranked sequence, continued across pages.
    pub rank: u32,
    pub label: String,
    pub label_type: LabelType,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Parameters of one leaderboard read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRequest {
    pub game_id: String,
    pub score_type: ScoreType,
    pub direction: RankingDirection,
    /// Page size; defaults and bounds come from configuration.
    pub limit: Option<u32>,
    /// Opaque continuation token from a previous page.
    pub cursor: Option<String>,
}

/// One page of a ranked leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub game_id: String,
    pub score_type: ScoreType,
    pub direction: RankingDirection,
    pub entries: Vec<LeaderboardEntry>,
    /// Present when the store returned a full page; passing it back
    /// continues the scan and the rank numbering.
    pub next_cursor: Option<String>,
}

/// Static liveness payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(label: &str, label_type: LabelType, score: f64) -> ServiceResult<ScoreSubmission> {
        ScoreSubmission::new("snake_classic", label, label_type, score, ScoreType::Points)
    }

    #[test]
    fn test_valid_submission_with_initials() {
        let submission = submission("KMW", LabelType::Initials, 100.5).unwrap();
        assert_eq!(submission.game_id, "snake_classic");
        assert_eq!(submission.label, "KMW");
        assert_eq!(submission.label_type, LabelType::Initials);
        assert_eq!(submission.score, 100.5);
        assert_eq!(submission.score_type, ScoreType::Points);
    }

    #[test]
    fn test_game_id_is_normalized() {
        let submission = ScoreSubmission::new(
            "  Snake_Classic  ",
            "player123",
            LabelType::Username,
            10.0,
            ScoreType::Points,
        )
        .unwrap();
        assert_eq!(submission.game_id, "snake_classic");
    }

    #[test]
    fn test_game_id_rejections() {
        assert!(normalize_game_id("").is_err());
        assert!(normalize_game_id("   ").is_err());
        assert!(normalize_game_id("snake classic").is_err());
        assert!(normalize_game_id("snake/classic").is_err());
        assert!(normalize_game_id(&"g".repeat(MAX_GAME_ID_LENGTH + 1)).is_err());
        assert_eq!(normalize_game_id("race-game_2").unwrap(), "race-game_2");
    }

    #[test]
    fn test_label_control_characters_are_stripped() {
        let submission = submission("K\u{7}M\u{1b}W", LabelType::Initials, 1.0).unwrap();
        assert_eq!(submission.label, "KMW");
    }

    #[test]
    fn test_label_rejections() {
        assert!(submission("", LabelType::Custom, 1.0).is_err());
        assert!(submission("   ", LabelType::Custom, 1.0).is_err());
        assert!(submission(&"x".repeat(MAX_LABEL_LENGTH + 1), LabelType::Custom, 1.0).is_err());
    }

    #[test]
    fn test_initials_must_be_three_alphanumerics() {
        assert!(submission("KM", LabelType::Initials, 1.0).is_err());
        assert!(submission("KMWX", LabelType::Initials, 1.0).is_err());
        assert!(submission("K-W", LabelType::Initials, 1.0).is_err());
        assert!(submission("AB1", LabelType::Initials, 1.0).is_ok());
    }

    #[test]
    fn test_score_rejections() {
        assert!(submission("KMW", LabelType::Initials, -1.0).is_err());
        assert!(submission("KMW", LabelType::Initials, f64::NAN).is_err());
        assert!(submission("KMW", LabelType::Initials, f64::INFINITY).is_err());
    }

    #[test]
    fn test_unknown_score_type_fails_deserialization() {
        assert!(serde_json::from_str::<ScoreType>("\"BOGUS\"").is_err());
        assert_eq!(
            serde_json::from_str::<ScoreType>("\"POINTS\"").unwrap(),
            ScoreType::Points
        );
        assert_eq!(
            serde_json::from_str::<ScoreType>("\"TIME_IN_MILLISECONDS\"").unwrap(),
            ScoreType::TimeInMilliseconds
        );
    }

    #[test]
    fn test_label_type_defaults_to_custom_on_the_wire() {
        let submission: ScoreSubmission = serde_json::from_str(
            r#"{"game_id":"snake_classic","label":"Blue Team","score":12.5,"score_type":"POINTS"}"#,
        )
        .unwrap();
        assert_eq!(submission.label_type, LabelType::Custom);
    }

    #[test]
    fn test_record_derives_sort_key() {
        let record = ScoreRecord::from_submission(
            ScoreSubmission::new("snake_classic", "KMW", LabelType::Initials, 103.0, ScoreType::Points)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(record.sort_key, "POINTS#000000103.000");
    }

    #[test]
    fn test_sort_key_is_a_pure_function_of_type_and_score() {
        let make = || {
            ScoreRecord::from_submission(
                ScoreSubmission::new("g1", "ABC", LabelType::Initials, 250.0, ScoreType::Points)
                    .unwrap(),
            )
            .unwrap()
        };
        // timestamps differ between the two records, sort keys never do
        assert_eq!(make().sort_key, make().sort_key);
    }

    #[test]
    fn test_record_overflow_is_a_validation_error() {
        let result = ScoreRecord::from_submission(
            ScoreSubmission {
                game_id: "snake_classic".to_string(),
                label: "KMW".to_string(),
                label_type: LabelType::Initials,
                score: 1e9,
                score_type: ScoreType::Points,
            },
        );
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
