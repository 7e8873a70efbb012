//! Credential selection
//!
//! Callers may hand the proxy several upstream keys at once: a comma-separated
//! list in a dedicated header, plus an optional `Authorization: Bearer` token.
//! One of them is picked at random for each request.

use axum::http::header::{HeaderMap, AUTHORIZATION};
use rand::Rng;

/// Dedicated header carrying Groq keys
pub const GROQ_KEY_HEADER: &str = "x-groq-api-key";
/// Dedicated header carrying Gemini keys
pub const GEMINI_KEY_HEADER: &str = "x-goog-api-key";

/// Source of the index used to pick one key out of the candidates
///
/// The production chooser is uniformly random; tests inject a fixed one.
pub trait KeyChooser: Send + Sync {
    /// Return an index in `0..len`. Never called with `len == 0`.
    fn choose(&self, len: usize) -> usize;
}

/// Uniform random choice backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChooser;

impl KeyChooser for RandomChooser {
    fn choose(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Extract the token following `Bearer ` (case-sensitive, one space)
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Collect every candidate key in insertion order
///
/// Keys from the dedicated header come first (repeated header lines are
/// treated as one comma-joined list), then the bearer token if present.
/// Duplicates are kept.
pub fn candidate_keys(headers: &HeaderMap, key_header: &str) -> Vec<String> {
    let mut keys: Vec<String> = headers
        .get_all(key_header)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect();

    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        keys.push(token.to_string());
    }

    keys
}

/// Pick one key for this request, or `None` when the caller supplied none
pub fn select_key(
    headers: &HeaderMap,
    key_header: &str,
    chooser: &dyn KeyChooser,
) -> Option<String> {
    let mut keys = candidate_keys(headers, key_header);
    if keys.is_empty() {
        return None;
    }

    let index = chooser.choose(keys.len()) % keys.len();
    Some(keys.swap_remove(index))
}

/// Shorten a key for logs and diagnostics
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
