use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_SESSION_TITLE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    pub default_session_title: String,
    /// Upper bound applied to any caller-provided list limit
    pub max_list_limit: usize,
    /// Capacity of the event channel handed to a coaching view
    pub event_buffer: usize,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            default_session_title: DEFAULT_SESSION_TITLE.to_string(),
            max_list_limit: 100,
            event_buffer: 64,
        }
    }
}

impl CoachConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_session_title(mut self, title: impl Into<String>) -> Self {
        self.default_session_title = title.into();
        self
    }

    pub fn with_max_list_limit(mut self, limit: usize) -> Self {
        self.max_list_limit = limit;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    /// Clamp a requested limit to `1..=max_list_limit`
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.max_list_limit)
            .clamp(1, self.max_list_limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        let config = CoachConfig::new().with_max_list_limit(50);
        assert_eq!(config.clamp_limit(None), 50);
        assert_eq!(config.clamp_limit(Some(0)), 1);
        assert_eq!(config.clamp_limit(Some(10)), 10);
        assert_eq!(config.clamp_limit(Some(500)), 50);
    }
}
