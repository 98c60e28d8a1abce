use serde::{Deserialize, Serialize};

/// Quiet period (ms) after the last keystroke before options are fetched.
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;

/// How responses from overlapping option fetches are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StaleResponsePolicy {
    /// Every response is applied as it arrives; the last to resolve wins,
    /// even when it answers an older query.
    #[default]
    LastWriteWins,
    /// Responses are tagged with their dispatch order and dropped if a
    /// newer request has already been applied.
    LatestRequestWins,
}

/// Editor tuning supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub debounce_ms: u32,
    pub stale_responses: StaleResponsePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.stale_responses, StaleResponsePolicy::LastWriteWins);
    }

    #[test]
    fn test_policy_from_json() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"staleResponses": "latestRequestWins"}"#).unwrap();
        assert_eq!(config.stale_responses, StaleResponsePolicy::LatestRequestWins);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }
}
