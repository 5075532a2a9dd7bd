//! Opaque pagination cursor.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Continuation token between leaderboard pages.
///
/// Carries where the previous page's scan stopped and the last rank it
/// assigned, so the next page restarts the range scan and continues the
/// numbering at `last_rank + 1`. Callers treat the encoded form as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Sort key of the last item the store returned for the previous page.
    pub last_sort_key: String,
    /// Last rank assigned on the previous page.
    pub last_rank: u32,
}

impl PageCursor {
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("cursor serialization cannot fail");
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> ServiceResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| ServiceError::Validation("invalid cursor".to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|_| ServiceError::Validation("invalid cursor".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cursor = PageCursor {
            last_sort_key: "POINTS#000000103.000".to_string(),
            last_rank: 10,
        };
        assert_eq!(PageCursor::decode(&cursor.encode()).unwrap(), cursor);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(PageCursor::decode("not base64 at all!").is_err());
        // valid base64, invalid payload
        let token = URL_SAFE_NO_PAD.encode(b"{\"nope\":1}");
        assert!(PageCursor::decode(&token).is_err());
    }
}
