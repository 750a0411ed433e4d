// Terminal rendering of store views

use crate::filter::Filter;
use crate::stats::Stats;
use crate::todo::Todo;
use colored::Colorize;

/// Make user text safe to print on one terminal line
///
/// Control characters (newlines, escapes) are shown escaped so stored text
/// cannot move the cursor or inject terminal sequences.
pub fn escape_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { c.escape_default().to_string() } else { c.to_string() })
        .collect()
}

/// One list line: checkbox, text, id
pub fn todo_line(todo: &Todo) -> String {
    let text = escape_text(todo.text());
    if todo.completed() {
        format!("[x] {}  {}", text.strikethrough().dimmed(), todo.id().to_string().dimmed())
    } else {
        format!("[ ] {}  {}", text, todo.id().to_string().dimmed())
    }
}

/// Lines for a filtered view, with an empty-state line when nothing matches
pub fn view_lines(view: &[&Todo], filter: Filter) -> Vec<String> {
    if view.is_empty() {
        let message = match filter {
            Filter::All => "Nothing to do. Add a task to get started.",
            Filter::Active => "No active tasks.",
            Filter::Completed => "No completed tasks.",
        };
        return vec![message.italic().to_string()];
    }

    view.iter().map(|todo| todo_line(todo)).collect()
}

/// Footer: summary line, plus progress and the clear hint
pub fn footer_lines(stats: &Stats) -> Vec<String> {
    let mut lines = vec![stats.summary().bold().to_string(), stats.progress()];
    if stats.can_clear_completed() {
        lines.push("Run `todostore clear-completed` to remove completed tasks".dimmed().to_string());
    }
    lines
}
