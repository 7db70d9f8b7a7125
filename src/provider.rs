//! Provider detection and the fixed Z.AI key set.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::store::{Config, Env};

pub const AUTH_TOKEN_KEY: &str = "ANTHROPIC_AUTH_TOKEN";
pub const BASE_URL_KEY: &str = "ANTHROPIC_BASE_URL";
pub const TIMEOUT_KEY: &str = "API_TIMEOUT_MS";
pub const OPUS_MODEL_KEY: &str = "ANTHROPIC_DEFAULT_OPUS_MODEL";
pub const SONNET_MODEL_KEY: &str = "ANTHROPIC_DEFAULT_SONNET_MODEL";
pub const HAIKU_MODEL_KEY: &str = "ANTHROPIC_DEFAULT_HAIKU_MODEL";

/// Substring of the base URL that identifies Z.AI
pub const ZAI_MARKER: &str = "z.ai";

pub const ZAI_BASE_URL: &str = "https://api.z.ai/api/anthropic";
pub const ZAI_TIMEOUT_MS: &str = "3000000";
pub const ZAI_OPUS_MODEL: &str = "GLM-4.6";
pub const ZAI_SONNET_MODEL: &str = "GLM-4.6";
pub const ZAI_HAIKU_MODEL: &str = "GLM-4.5-Air";

/// Keys owned by a Z.AI profile. The auth token is shared and not listed.
pub static ZAI_ENV_KEYS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        BASE_URL_KEY,
        TIMEOUT_KEY,
        OPUS_MODEL_KEY,
        SONNET_MODEL_KEY,
        HAIKU_MODEL_KEY,
    ])
});

pub fn is_zai_key(key: &str) -> bool {
    ZAI_ENV_KEYS.contains(key)
}

/// Which upstream a settings file points at
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    Zai,
    Custom,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Provider {
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::Zai => "Z.AI",
            Provider::Custom => "Custom",
            Provider::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classify a config by its base URL.
///
/// An empty mapping is `Unknown`; no base URL means the Anthropic default.
pub fn classify(config: &Config) -> Provider {
    if config.is_empty() {
        return Provider::Unknown;
    }

    let base_url = config.get(BASE_URL_KEY).unwrap_or_default();
    if base_url.contains(ZAI_MARKER) {
        Provider::Zai
    } else if base_url.is_empty() {
        Provider::Anthropic
    } else {
        Provider::Custom
    }
}

/// Fresh Z.AI config: the five Z.AI keys plus the token, nothing else
pub fn zai_config(token: &str) -> Config {
    let env: Env = [
        (AUTH_TOKEN_KEY, token),
        (BASE_URL_KEY, ZAI_BASE_URL),
        (TIMEOUT_KEY, ZAI_TIMEOUT_MS),
        (OPUS_MODEL_KEY, ZAI_OPUS_MODEL),
        (SONNET_MODEL_KEY, ZAI_SONNET_MODEL),
        (HAIKU_MODEL_KEY, ZAI_HAIKU_MODEL),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Config::new(env)
}

/// Drop every Z.AI key, keeping the rest (including the auth token)
pub fn strip_zai_keys(env: &Env) -> Env {
    env.iter()
        .filter(|(k, _)| !is_zai_key(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
