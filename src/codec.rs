// Persisted JSON layout for the todo collection

use crate::todo::{Todo, TodoId};
use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Serialize the full collection as a JSON array
pub fn encode(todos: &[Todo]) -> Result<String> {
    serde_json::to_string(todos).context("Failed to serialize todos")
}

/// Decode a persisted collection
///
/// A root that is not a JSON array yields an empty collection. Entries that
/// are not objects, or lack a usable `id` or `text`, are skipped; duplicate
/// ids keep their first occurrence. `completed` defaults to false and
/// `createdAt` accepts RFC 3339 strings or epoch milliseconds, falling back
/// to the load time.
pub fn decode(raw: &str) -> Vec<Todo> {
    let root: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = ?e, "Persisted todos are not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let entries = match root {
        Value::Array(entries) => entries,
        other => {
            warn!(kind = kind_of(&other), "Persisted todos are not an array, starting empty");
            return Vec::new();
        }
    };

    let loaded_at = Utc::now();
    let mut seen = HashSet::new();
    let mut todos = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let todo = match decode_entry(entry, loaded_at) {
            Some(t) => t,
            None => {
                warn!(index, "Skipping malformed todo entry");
                continue;
            }
        };

        if !seen.insert(todo.id().clone()) {
            warn!(index, id = %todo.id(), "Skipping duplicate todo id");
            continue;
        }

        todos.push(todo);
    }

    debug!(count = todos.len(), "Decoded persisted todos");
    todos
}

fn decode_entry(entry: &Value, loaded_at: DateTime<Utc>) -> Option<Todo> {
    let obj = entry.as_object()?;

    let id = obj.get("id").and_then(Value::as_str)?;
    let text = obj.get("text").and_then(Value::as_str)?;
    let completed = obj.get("completed").and_then(Value::as_bool).unwrap_or(false);
    let created_at = obj.get("createdAt").and_then(decode_timestamp).unwrap_or(loaded_at);

    Todo::restore(TodoId::from(id), text, completed, created_at)
}

fn decode_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
