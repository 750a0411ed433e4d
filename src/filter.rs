// View filter over the todo collection

use crate::error::TodoError;
use crate::todo::Todo;
use std::str::FromStr;

/// Which todos a view shows
///
/// The filter is view state only: it never changes the collection and is
/// never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether `todo` belongs in this view
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed(),
            Filter::Completed => todo.completed(),
        }
    }

    /// Order-preserving subsequence of `todos` selected by this filter
    pub fn apply(self, todos: &[Todo]) -> Vec<&Todo> {
        todos.iter().filter(|todo| self.matches(todo)).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl FromStr for Filter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(TodoError::InvalidFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
