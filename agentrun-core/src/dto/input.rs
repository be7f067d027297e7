//! Job input payloads

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::{Map, Value as JsonValue};

/// Caller-supplied input forwarded verbatim as the body of a start request
///
/// The shape is agent-specific. Nothing beyond "is a JSON object" is checked.
pub type JobInput = Map<String, JsonValue>;

/// Converts any serializable value into a [`JobInput`]
///
/// Fails when the value does not serialize to a JSON object.
pub fn to_job_input<T: Serialize + ?Sized>(value: &T) -> Result<JobInput, serde_json::Error> {
    match serde_json::to_value(value)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(serde_json::Error::custom(format!(
            "job input must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Search {
        major: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_tuition: Option<u32>,
    }

    #[test]
    fn test_struct_becomes_object() {
        let input = to_job_input(&Search {
            major: "CS".to_string(),
            max_tuition: None,
        })
        .unwrap();

        assert_eq!(input.get("major"), Some(&json!("CS")));
        assert!(!input.contains_key("max_tuition"));
    }

    #[test]
    fn test_map_passes_through() {
        let input = to_job_input(&json!({ "search_query": "beach towns", "max_colleges": 5 })).unwrap();
        assert_eq!(input.len(), 2);
        assert_eq!(input.get("max_colleges"), Some(&json!(5)));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = to_job_input(&vec![1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
