// Derived counts and summary lines

use crate::todo::Todo;

/// Counts over the whole collection, independent of the active filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Stats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|t| t.completed()).count();
        Self {
            total: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }

    /// Human-readable count line shown under the list
    pub fn summary(&self) -> String {
        if self.total == 0 {
            "No tasks".to_string()
        } else if self.active == 0 {
            "All done! 🎉".to_string()
        } else if self.completed == 0 {
            let plural = if self.active == 1 { "" } else { "s" };
            format!("{} task{}", self.active, plural)
        } else {
            format!("{} active, {} completed", self.active, self.completed)
        }
    }

    /// Progress line shown under the title
    pub fn progress(&self) -> String {
        if self.total == 0 {
            "No tasks yet".to_string()
        } else {
            format!("{} of {} tasks completed", self.completed, self.total)
        }
    }

    /// Clearing completed todos only makes sense when there are some
    pub fn can_clear_completed(&self) -> bool {
        self.completed > 0
    }
}
