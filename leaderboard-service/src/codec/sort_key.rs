//! Sort key builder/parser
//!
//! A stored item's sort key is `{score_type}#{encoded_score}`. Score type
//! tokens come from a closed enum, so the `#` separator can never occur
//! inside a token and the key always splits unambiguously.

use super::{decode, CodecError};
use crate::domain::models::ScoreType;

/// Separator between the score type token and the encoded score.
pub const SEPARATOR: char = '#';

/// A sort key decomposed back into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSortKey {
    pub score_type: ScoreType,
    pub score: f64,
}

/// Compose a sort key from a score type and an already-encoded score.
pub fn build(score_type: ScoreType, encoded_score: &str) -> String {
    format!("{}{}{}", score_type.as_str(), SEPARATOR, encoded_score)
}

/// The range-scan prefix selecting every entry of one score type.
pub fn prefix(score_type: ScoreType) -> String {
    format!("{}{}", score_type.as_str(), SEPARATOR)
}

/// Decompose a stored sort key.
///
/// Fails if the separator is missing, the score type token is not a member
/// of the closed enum, or the encoded score does not decode.
pub fn parse(sort_key: &str) -> Result<ParsedSortKey, CodecError> {
    let (token, encoded) = sort_key
        .split_once(SEPARATOR)
        .ok_or_else(|| CodecError::MalformedSortKey(sort_key.to_string()))?;
    let score_type =
        ScoreType::from_token(token).ok_or_else(|| CodecError::UnknownScoreType(token.to_string()))?;
    let score = decode(encoded)?;
    Ok(ParsedSortKey { score_type, score })
}
