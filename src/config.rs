//! Reveal timing and environment configuration.

use std::env;

use response_source::DelayRange;

use crate::error::ConfigError;

pub const THINK_DELAY_ENV_VAR: &str = "CHAT_REVEAL_THINK_MS";
pub const PREP_DELAY_ENV_VAR: &str = "CHAT_REVEAL_PREP_MS";
pub const CHAR_DELAY_ENV_VAR: &str = "CHAT_REVEAL_CHAR_MS";
pub const WELCOME_ENV_VAR: &str = "CHAT_REVEAL_WELCOME";
pub const LOG_FILTER_ENV_VAR: &str = "CHAT_REVEAL_LOG";
pub const LOG_FILE_ENV_VAR: &str = "CHAT_REVEAL_LOG_FILE";
pub const SKIP_BOOT_ENV_VAR: &str = "GALXIUM_SKIP_BOOT";

pub const DEFAULT_WELCOME: &str = "Greetings, Commander. I am Galxium, your cosmic AI companion. How may I assist you in navigating the infinite expanse of space and knowledge?";

/// Delay ranges for the three phases of a turn plus the seeded greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealConfig {
    /// Pause between the user message and the agent placeholder.
    pub think_delay: DelayRange,
    /// Pause between the placeholder and the first revealed character.
    pub prep_delay: DelayRange,
    /// Pause before each revealed character.
    pub char_delay: DelayRange,
    pub welcome: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            think_delay: DelayRange::ordered(1000, 2000),
            prep_delay: DelayRange::ordered(500, 800),
            char_delay: DelayRange::ordered(30, 50),
            welcome: DEFAULT_WELCOME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub reveal: RevealConfig,
    pub log_filter: Option<String>,
    pub log_file: Option<String>,
    pub skip_boot: bool,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = RevealConfig::default();

        Ok(Self {
            reveal: RevealConfig {
                think_delay: env_range(THINK_DELAY_ENV_VAR, defaults.think_delay)?,
                prep_delay: env_range(PREP_DELAY_ENV_VAR, defaults.prep_delay)?,
                char_delay: env_range(CHAR_DELAY_ENV_VAR, defaults.char_delay)?,
                welcome: env_string_opt(WELCOME_ENV_VAR)
                    .map(|value| value.trim().to_string())
                    .unwrap_or(defaults.welcome),
            },
            log_filter: env_string_opt(LOG_FILTER_ENV_VAR),
            log_file: env_string_opt(LOG_FILE_ENV_VAR),
            skip_boot: env_flag(SKIP_BOOT_ENV_VAR),
        })
    }
}

fn env_range(key: &'static str, default: DelayRange) -> Result<DelayRange, ConfigError> {
    match env_string_opt(key) {
        Some(raw) => raw
            .parse()
            .map_err(|source| ConfigError::InvalidRange { key, source }),
        None => Ok(default),
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
