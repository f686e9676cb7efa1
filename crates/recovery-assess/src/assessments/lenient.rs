//! Forgiving field decoders for raw questionnaire responses.
//!
//! Responses come from form state and from previously stored blobs, so field
//! content is never trusted: anything that cannot be read as the expected shape
//! decodes as "unset" and the scoring engine applies its neutral default.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Categorical answer with a set of known labels.
pub trait Choice: Sized {
    /// Maps a non-blank label onto the closest branch; unknown labels are kept
    /// verbatim on a zero-contribution branch.
    fn from_label(label: &str) -> Self;
    /// Label written back to stored responses.
    fn label(&self) -> &str;
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(numeric))
}

pub(crate) fn choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Choice,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Some(T::from_label(raw.trim())),
        _ => None,
    })
}

pub(crate) fn tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let mut collected: Vec<String> = Vec::new();
    let mut push = |raw: &str| {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && !collected.iter().any(|existing| existing == trimmed) {
            collected.push(trimmed.to_string());
        }
    };

    match value {
        Some(Value::String(raw)) => push(&raw),
        Some(Value::Array(items)) => {
            for item in &items {
                if let Value::String(raw) = item {
                    push(raw);
                }
            }
        }
        _ => {}
    }

    Ok(collected)
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        _ => None,
    })
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

/// Splits comma-separated free text into trimmed, non-empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "number")]
        level: Option<f64>,
        #[serde(default, deserialize_with = "tags")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "text")]
        note: Option<String>,
    }

    fn decode(value: Value) -> Fields {
        serde_json::from_value(value).expect("fields decode")
    }

    #[test]
    fn numbers_accept_numeric_strings_and_ignore_junk() {
        assert_eq!(decode(json!({ "level": 7 })).level, Some(7.0));
        assert_eq!(decode(json!({ "level": " 4.5 " })).level, Some(4.5));
        assert_eq!(decode(json!({ "level": "high" })).level, None);
        assert_eq!(decode(json!({ "level": true })).level, None);
        assert_eq!(decode(json!({ "level": null })).level, None);
        assert_eq!(decode(json!({})).level, None);
    }

    #[test]
    fn tags_accept_single_strings_and_collapse_duplicates() {
        assert_eq!(decode(json!({ "items": "alcohol" })).items, vec!["alcohol"]);
        assert_eq!(
            decode(json!({ "items": ["Stress", " ", "Stress", 4, "Boredom"] })).items,
            vec!["Stress", "Boredom"]
        );
        assert!(decode(json!({ "items": {} })).items.is_empty());
    }

    #[test]
    fn blank_text_is_unset() {
        assert_eq!(decode(json!({ "note": "   " })).note, None);
        assert_eq!(decode(json!({ "note": " walk " })).note.as_deref(), Some("walk"));
    }

    #[test]
    fn split_list_drops_empty_entries() {
        assert_eq!(split_list("work, , money ,"), vec!["work", "money"]);
        assert!(split_list("").is_empty());
    }
}
