//! Credential shape heuristics and masking.
//!
//! Z.AI uses short API keys. Anthropic's web login stores a long JWT-like
//! session token that the user cannot regenerate on demand, which is why the
//! backup slot exists at all.

use crate::provider::Provider;

const MASK_PLACEHOLDER: &str = "********";
const API_KEY_PREFIXES: [&str; 2] = ["sk-", "zai-"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short user-generated key (`sk-...`, `zai-...`)
    ApiKey,
    /// Long web login session token
    WebSession,
    Unknown,
}

/// Guess the token type from its shape
pub fn classify_token(token: &str) -> TokenKind {
    if token.is_empty() {
        return TokenKind::Unknown;
    }

    if API_KEY_PREFIXES.iter().any(|p| token.starts_with(p)) {
        return TokenKind::ApiKey;
    }

    let len = token.chars().count();
    let dots = token.matches('.').count();

    if (dots >= 2 && len > 100) || len > 200 {
        TokenKind::WebSession
    } else if len < 100 {
        TokenKind::ApiKey
    } else {
        TokenKind::Unknown
    }
}

/// `abcd...wxyz`, or a fixed placeholder for short tokens
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return MASK_PLACEHOLDER.to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Non-blocking warning about a token that doesn't fit its target provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub summary: &'static str,
    pub hint: &'static str,
}

/// Check the token shape against what `provider` normally uses.
///
/// Never rejects a token; the caller reports the advisory and carries on.
pub fn validate_for_provider(token: &str, provider: Provider) -> Option<Advisory> {
    match (provider, classify_token(token)) {
        (Provider::Zai, TokenKind::WebSession) => Some(Advisory {
            summary: "Token looks like an Anthropic web login token",
            hint: "Z.AI typically uses API keys (sk-xxx or zai-xxx format)",
        }),
        (Provider::Anthropic, TokenKind::ApiKey) => Some(Advisory {
            summary: "Token looks like an API key, not a web login token",
            hint: "Anthropic web login uses longer JWT-style tokens",
        }),
        _ => None,
    }
}
