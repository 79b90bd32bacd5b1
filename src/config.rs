//! Configuration for cmdlens.
//!
//! All configuration comes from environment variables, resolved once at
//! process start into a `Settings` value that is passed to each component.

/// Default chat-completion endpoint, used by the CLI when no override is set.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API credential: `CMDLENS_API_KEY`, falling back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    /// Endpoint override from `CMDLENS_API_URL`. The CLI falls back to
    /// [`DEFAULT_API_URL`]; the daemon treats an unset URL as "no endpoint
    /// configured" and answers in prompt-only mode.
    pub api_url: Option<String>,
    /// Shared secret required by the daemon, from `CMDLENS_DAEMON_TOKEN`.
    pub daemon_token: Option<String>,
    /// Daemon default model, from `CMDLENS_MODEL`.
    pub default_model: String,
}

impl Settings {
    /// Load settings from the environment.
    pub fn from_env() -> Self {
        Self {
            api_key: env_non_empty("CMDLENS_API_KEY").or_else(|| env_non_empty("OPENAI_API_KEY")),
            api_url: env_non_empty("CMDLENS_API_URL"),
            daemon_token: env_non_empty("CMDLENS_DAEMON_TOKEN"),
            default_model: env_non_empty("CMDLENS_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Endpoint the CLI should use: the override or the public default.
    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_falls_back_to_default() {
        let settings = Settings {
            api_key: None,
            api_url: None,
            daemon_token: None,
            default_model: DEFAULT_MODEL.to_string(),
        };
        assert_eq!(settings.api_url_or_default(), DEFAULT_API_URL);
    }

    #[test]
    fn test_api_url_override_wins() {
        let settings = Settings {
            api_key: None,
            api_url: Some("http://localhost:9999/v1/chat/completions".to_string()),
            daemon_token: None,
            default_model: DEFAULT_MODEL.to_string(),
        };
        assert_eq!(
            settings.api_url_or_default(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[test]
    fn test_empty_env_value_counts_as_unset() {
        std::env::set_var("CMDLENS_TEST_EMPTY_VAR", "");
        assert_eq!(env_non_empty("CMDLENS_TEST_EMPTY_VAR"), None);
        std::env::set_var("CMDLENS_TEST_EMPTY_VAR", "value");
        assert_eq!(
            env_non_empty("CMDLENS_TEST_EMPTY_VAR"),
            Some("value".to_string())
        );
        std::env::remove_var("CMDLENS_TEST_EMPTY_VAR");
    }
}
