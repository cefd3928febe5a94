//! Token helpers for loosely typed catalog fields.
//!
//! Catalog sources disagree on how list fields are stored: some serve real
//! arrays, others a string holding a JSON array, others a comma-separated
//! string. Everything funnels through [`parse_tokens`].

use serde::{Deserialize, Deserializer};

/// Lower-case and trim a token for comparison
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Split a string field into tokens
///
/// Accepts `["a", "b"]` (JSON) as well as `a, b` (CSV style). Empty tokens
/// are dropped; case is preserved.
pub fn parse_tokens(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed) {
            return clean(list);
        }
    }

    let inner = trimmed.trim_start_matches('[').trim_end_matches(']');
    clean(
        inner
            .split([',', ';'])
            .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
            .collect(),
    )
}

fn clean(list: Vec<String>) -> Vec<String> {
    list.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    List(Vec<String>),
    Text(String),
}

/// Deserialize a list field that may arrive as an array, a string, or null
pub fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawList>::deserialize(deserializer)? {
        Some(RawList::List(list)) => clean(list),
        Some(RawList::Text(text)) => parse_tokens(&text),
        None => Vec::new(),
    })
}

/// Deserialize a scalar text field that may be null
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| s.trim().to_string())
        .unwrap_or_default())
}
