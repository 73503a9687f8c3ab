//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Canned text the simulated worker sends back after every customer message.
pub const DEFAULT_CANNED_REPLY: &str = "Thanks for your message! I'll get back to you shortly.";

/// What a modal does with its local state after handing a payload to the
/// submission sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Reset immediately after invoking the sink, whatever it returned.
    #[default]
    Always,
    /// Reset only when the sink acknowledged the payload.
    OnSuccess,
}

impl ResetPolicy {
    /// Whether state should be cleared given the sink's outcome.
    pub fn should_reset(&self, sink_succeeded: bool) -> bool {
        match self {
            Self::Always => true,
            Self::OnSuccess => sink_succeeded,
        }
    }
}

impl std::fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::OnSuccess => write!(f, "on_success"),
        }
    }
}

impl std::str::FromStr for ResetPolicy {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "on_success" | "on-success" => Ok(Self::OnSuccess),
            other => Err(ConfigError::InvalidValue {
                key: "WORKER_CONNECT_RESET_POLICY".to_string(),
                message: format!("expected 'always' or 'on_success', got '{other}'"),
            }),
        }
    }
}

/// Application configuration shared by every modal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Delay before the simulated worker reply lands in a conversation.
    pub reply_delay: Duration,
    /// Text of the simulated worker reply.
    pub canned_reply: String,
    /// Reset behaviour after a submission.
    pub reset_policy: ResetPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_secs(2),
            canned_reply: DEFAULT_CANNED_REPLY.to_string(),
            reset_policy: ResetPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `WORKER_CONNECT_*` environment variables.
    /// Unset variables fall back to defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let reply_delay = match std::env::var("WORKER_CONNECT_REPLY_DELAY_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::InvalidValue {
                    key: "WORKER_CONNECT_REPLY_DELAY_MS".to_string(),
                    message: format!("expected milliseconds, got '{raw}': {e}"),
                })?,
            Err(_) => defaults.reply_delay,
        };

        let canned_reply = std::env::var("WORKER_CONNECT_CANNED_REPLY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.canned_reply);

        let reset_policy = match std::env::var("WORKER_CONNECT_RESET_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.reset_policy,
        };

        Ok(Self {
            reply_delay,
            canned_reply,
            reset_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.reply_delay, Duration::from_secs(2));
        assert_eq!(config.canned_reply, DEFAULT_CANNED_REPLY);
        assert_eq!(config.reset_policy, ResetPolicy::Always);
    }

    #[test]
    fn reset_policy_parses() {
        assert_eq!("always".parse::<ResetPolicy>().unwrap(), ResetPolicy::Always);
        assert_eq!(
            "On_Success".parse::<ResetPolicy>().unwrap(),
            ResetPolicy::OnSuccess
        );
        assert_eq!(
            "on-success".parse::<ResetPolicy>().unwrap(),
            ResetPolicy::OnSuccess
        );
        assert!("sometimes".parse::<ResetPolicy>().is_err());
    }

    #[test]
    fn reset_policy_decision() {
        assert!(ResetPolicy::Always.should_reset(true));
        assert!(ResetPolicy::Always.should_reset(false));
        assert!(ResetPolicy::OnSuccess.should_reset(true));
        assert!(!ResetPolicy::OnSuccess.should_reset(false));
    }

    #[test]
    fn display_matches_serde() {
        for policy in [ResetPolicy::Always, ResetPolicy::OnSuccess] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(format!("\"{policy}\""), json);
        }
    }

    // ── from_env tests ──────────────────────────────────────────────

    const VARS: [&str; 3] = [
        "WORKER_CONNECT_REPLY_DELAY_MS",
        "WORKER_CONNECT_CANNED_REPLY",
        "WORKER_CONNECT_RESET_POLICY",
    ];

    fn clear_vars() {
        for var in VARS {
            // SAFETY: only config_from_env touches WORKER_CONNECT_* variables.
            unsafe { std::env::remove_var(var) };
        }
    }

    fn set_var(key: &str, value: &str) {
        // SAFETY: only config_from_env touches WORKER_CONNECT_* variables.
        unsafe { std::env::set_var(key, value) };
    }

    fn invalid_key(result: Result<AppConfig, ConfigError>) -> String {
        match result {
            Err(ConfigError::InvalidValue { key, .. }) => key,
            Ok(config) => panic!("Expected InvalidValue, got {config:?}"),
        }
    }

    #[test]
    fn config_from_env() {
        clear_vars();
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.reply_delay, Duration::from_secs(2));
        assert_eq!(config.canned_reply, DEFAULT_CANNED_REPLY);
        assert_eq!(config.reset_policy, ResetPolicy::Always);

        set_var("WORKER_CONNECT_REPLY_DELAY_MS", " 250 ");
        set_var("WORKER_CONNECT_CANNED_REPLY", "Be right there");
        set_var("WORKER_CONNECT_RESET_POLICY", "on_success");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.reply_delay, Duration::from_millis(250));
        assert_eq!(config.canned_reply, "Be right there");
        assert_eq!(config.reset_policy, ResetPolicy::OnSuccess);

        // Every malformed value is an error, none silently defaults
        set_var("WORKER_CONNECT_REPLY_DELAY_MS", "soon");
        assert_eq!(invalid_key(AppConfig::from_env()), "WORKER_CONNECT_REPLY_DELAY_MS");
        set_var("WORKER_CONNECT_REPLY_DELAY_MS", "-5");
        assert_eq!(invalid_key(AppConfig::from_env()), "WORKER_CONNECT_REPLY_DELAY_MS");

        set_var("WORKER_CONNECT_REPLY_DELAY_MS", "250");
        set_var("WORKER_CONNECT_RESET_POLICY", "sometimes");
        assert_eq!(invalid_key(AppConfig::from_env()), "WORKER_CONNECT_RESET_POLICY");

        clear_vars();
    }
}
