use crate::event::record::RawEvent;

use serde_json::Value;
use std::fs;
use std::io::Read;
use thiserror::Error;

/// Failure to obtain the event sequence. Fatal to the render cycle.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read event source {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("event source {origin} is not valid JSON: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("event source {origin} must hold a JSON array of events, found {found}")]
    NotAnArray { origin: String, found: &'static str },

    #[error("event {index} in {origin} has an unexpected shape: {source}")]
    Event {
        origin: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// How a source path is named in messages.
pub fn origin_label(path: &str) -> &str {
    if path == "-" { "<stdin>" } else { path }
}

/// Read and parse the event file. `-` reads stdin.
pub fn load_events(path: &str) -> Result<Vec<RawEvent>, LoadError> {
    let origin = origin_label(path);
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| LoadError::Read {
                origin: origin.to_string(),
                source,
            })?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| LoadError::Read {
            origin: origin.to_string(),
            source,
        })?
    };

    let events = parse_events(&text, origin)?;
    tracing::info!("loaded {} events from {}", events.len(), origin);
    Ok(events)
}

/// Parse an event array. Elements are decoded one by one so a shape error
/// names its position.
pub fn parse_events(text: &str, origin: &str) -> Result<Vec<RawEvent>, LoadError> {
    let doc: Value = serde_json::from_str(text).map_err(|source| LoadError::Json {
        origin: origin.to_string(),
        source,
    })?;

    let items = match doc {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::NotAnArray {
                origin: origin.to_string(),
                found: json_kind(&other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| LoadError::Event {
                origin: origin.to_string(),
                index,
                source,
            })
        })
        .collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
