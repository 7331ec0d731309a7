//! Configuration types for the lead API client.

use std::time::Duration;

/// Configuration for connecting to the lead conversation API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server (e.g., "http://127.0.0.1:8788").
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get an organization's question set URL.
    pub fn question_set_url(&self, organization_id: &str) -> String {
        format!(
            "{}/question-set/{}",
            self.base_url,
            urlencoding::encode(organization_id)
        )
    }

    /// Get the question set upsert URL.
    pub fn create_question_set_url(&self) -> String {
        format!("{}/create/question-set", self.base_url)
    }

    /// Get the conversation collection URL.
    pub fn conversations_url(&self) -> String {
        format!("{}/lead/conversation", self.base_url)
    }

    /// Get a lead's conversation URL.
    pub fn conversation_url(&self, lead_id: &str) -> String {
        format!(
            "{}/lead/conversation/{}",
            self.base_url,
            urlencoding::encode(lead_id)
        )
    }

    /// Get the health check endpoint URL.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8788")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = ClientConfig::new("http://leads.local/");
        assert_eq!(config.health_url(), "http://leads.local/health");
        assert_eq!(
            config.question_set_url("org-1"),
            "http://leads.local/question-set/org-1"
        );
        assert_eq!(
            config.create_question_set_url(),
            "http://leads.local/create/question-set"
        );
        assert_eq!(
            config.conversation_url("a b"),
            "http://leads.local/lead/conversation/a%20b"
        );
        assert_eq!(
            config.conversations_url(),
            "http://leads.local/lead/conversation"
        );
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8788");
        assert_eq!(config.timeout, Duration::from_secs(30));

        let config = config.with_timeout(Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(2));
    }
}
