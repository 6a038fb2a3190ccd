//! Key normalization for wire payloads.
//!
//! The service may answer in any key convention (`outputUrl`, `OutputURL`,
//! `output-url`); jobs only ever look at `snake_case` keys.

use convert_case::{Case, Casing};
use serde_json::{Map, Value};

/// Recursively rewrite every object key to `snake_case`. Values are untouched.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (canonical_key(&key), normalize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Canonical form of a single key.
pub fn canonical_key(key: &str) -> String {
    if is_canonical(key) {
        return key.to_string();
    }
    key.to_case(Case::Snake)
}

// Keys already in canonical form are kept byte-for-byte, so digits and
// leading underscores are never re-split.
fn is_canonical(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_keys() {
        let out = normalize_keys(json!({
            "outputUrl": "https://x",
            "wordTimestamps": [{"startTime": 1, "word": "Hi"}]
        }));
        assert_eq!(
            out,
            json!({
                "output_url": "https://x",
                "word_timestamps": [{"start_time": 1, "word": "Hi"}]
            })
        );
    }

    #[test]
    fn test_values_are_not_rewritten() {
        let out = normalize_keys(json!({"mediaType": "streamUrl"}));
        assert_eq!(out, json!({"media_type": "streamUrl"}));
    }

    #[test]
    fn test_canonical_payload_is_unchanged() {
        let canonical = json!({
            "id": "m-1",
            "v2_index": true,
            "_meta": {"collection_id": "c-1"},
            "items": [{"word_timestamps": []}, 3, "text"]
        });
        assert_eq!(normalize_keys(canonical.clone()), canonical);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_keys(json!({"OutputURL": {"kebab-key": [{"innerKey": null}]}}));
        let twice = normalize_keys(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(normalize_keys(json!(null)), json!(null));
        assert_eq!(normalize_keys(json!("camelCase")), json!("camelCase"));
    }
}
