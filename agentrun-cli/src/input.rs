//! Job input parsing
//!
//! A job input is built from an optional JSON object (`--input`) and any
//! number of `--field key=value` overrides. Field values that parse as JSON
//! keep their type (`max_colleges=5` is a number); anything else is a string.

use agentrun_client::JobInput;
use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Builds the job input from command-line arguments
pub fn parse_input(json: Option<&str>, fields: &[String]) -> Result<JobInput> {
    let mut input = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("--input is not valid JSON")? {
            Value::Object(map) => map,
            other => bail!("--input must be a JSON object, got {}", kind_of(&other)),
        },
        None => JobInput::new(),
    };

    for field in fields {
        let (key, value) = parse_field(field)?;
        input.insert(key, value);
    }

    Ok(input)
}

fn parse_field(field: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = field.split_once('=') else {
        bail!("Field '{}' must be written as key=value", field);
    };

    let key = key.trim();
    if key.is_empty() {
        bail!("Field '{}' has an empty key", field);
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
