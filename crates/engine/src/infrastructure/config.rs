//! Engine configuration.
//!
//! Defaults are overridden by environment variables:
//! - DAGGERHEART_MASSIVE_DAMAGE: `true`/`false`, enables the massive damage tier
//! - DAGGERHEART_UNKNOWN_EVENTS: `ignore` or `reject`
//! - DAGGERHEART_STORE_TIMEOUT_MS: per storage call timeout, `0` disables it
//!
//! Invalid values are logged and ignored.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_MASSIVE_DAMAGE: &str = "DAGGERHEART_MASSIVE_DAMAGE";
pub const ENV_UNKNOWN_EVENTS: &str = "DAGGERHEART_UNKNOWN_EVENTS";
pub const ENV_STORE_TIMEOUT_MS: &str = "DAGGERHEART_STORE_TIMEOUT_MS";

/// What to do with an event type that is neither known nor legacy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEventPolicy {
    Ignore,
    #[default]
    Reject,
}

impl UnknownEventPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for UnknownEventPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnknownEventPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown event policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub massive_damage_enabled: bool,
    pub unknown_event_policy: UnknownEventPolicy,
    pub store_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            massive_damage_enabled: true,
            unknown_event_policy: UnknownEventPolicy::Reject,
            store_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup(ENV_MASSIVE_DAMAGE) {
            match parse_bool(&val) {
                Some(enabled) => {
                    config.massive_damage_enabled = enabled;
                    tracing::info!(enabled, "Applied {ENV_MASSIVE_DAMAGE}");
                }
                None => tracing::warn!(val = %val, "{ENV_MASSIVE_DAMAGE} is not a boolean, ignoring"),
            }
        }

        if let Some(val) = lookup(ENV_UNKNOWN_EVENTS) {
            match val.parse::<UnknownEventPolicy>() {
                Ok(policy) => {
                    config.unknown_event_policy = policy;
                    tracing::info!(policy = %policy, "Applied {ENV_UNKNOWN_EVENTS}");
                }
                Err(e) => tracing::warn!(val = %val, error = %e, "{ENV_UNKNOWN_EVENTS} invalid, ignoring"),
            }
        }

        if let Some(val) = lookup(ENV_STORE_TIMEOUT_MS) {
            match val.trim().parse::<u64>() {
                Ok(0) => config.store_timeout_ms = None,
                Ok(ms) => {
                    config.store_timeout_ms = Some(ms);
                    tracing::info!(ms, "Applied {ENV_STORE_TIMEOUT_MS}");
                }
                Err(_) => {
                    tracing::warn!(val = %val, "{ENV_STORE_TIMEOUT_MS} is not a valid u64, ignoring")
                }
            }
        }

        config
    }

    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
