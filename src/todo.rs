// Todo record and id generation

use crate::error::TodoError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, unique identifier of a todo
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TodoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single task
///
/// Records are immutable: the store replaces a record wholesale instead of
/// editing it in place. Serialized field names match the persisted layout
/// (`id`, `text`, `completed`, `createdAt`). Deserializing applies the same
/// checks as [`Todo::restore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TodoRecord")]
pub struct Todo {
    id: TodoId,
    text: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

/// Unchecked wire shape of a [`Todo`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoRecord {
    id: TodoId,
    text: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TodoRecord> for Todo {
    type Error = TodoError;

    fn try_from(record: TodoRecord) -> Result<Self, Self::Error> {
        Todo::restore(record.id.clone(), &record.text, record.completed, record.created_at)
            .ok_or_else(|| TodoError::InvalidTodo(record.id.to_string()))
    }
}

impl Todo {
    /// Build a fresh, not yet completed todo.
    ///
    /// Returns `None` when `text` is empty after trimming.
    pub fn new(id: TodoId, text: &str, created_at: DateTime<Utc>) -> Option<Self> {
        Self::restore(id, text, false, created_at)
    }

    /// Rebuild a todo from stored parts, applying the same text rules as `new`
    pub fn restore(id: TodoId, text: &str, completed: bool, created_at: DateTime<Utc>) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || id.as_str().is_empty() {
            return None;
        }

        Some(Self {
            id,
            text: text.to_string(),
            completed,
            created_at,
        })
    }

    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this todo with the completion flag flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// How new todo ids are minted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// UUID v7 (time-ordered, random tail)
    #[default]
    Uuid,
    /// Epoch milliseconds as a decimal string
    Timestamp,
}

impl IdStrategy {
    /// Mint an id that `taken` reports as unused
    pub fn generate(self, taken: impl Fn(&str) -> bool) -> TodoId {
        match self {
            IdStrategy::Uuid => loop {
                let id = Uuid::now_v7().to_string();
                if !taken(&id) {
                    return TodoId(id);
                }
            },
            IdStrategy::Timestamp => {
                let base = now_ms().to_string();
                if !taken(&base) {
                    return TodoId(base);
                }
                // Several adds within one millisecond
                (1u64..)
                    .map(|n| format!("{}-{}", base, n))
                    .find(|candidate| !taken(candidate))
                    .map(TodoId)
                    .unwrap_or_else(|| TodoId(Uuid::now_v7().to_string()))
            }
        }
    }
}

impl FromStr for IdStrategy {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uuid" => Ok(IdStrategy::Uuid),
            "timestamp" => Ok(IdStrategy::Timestamp),
            other => Err(TodoError::InvalidIdStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdStrategy::Uuid => write!(f, "uuid"),
            IdStrategy::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Current timestamp in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
