// Domain error kinds

/// Errors raised by the todo domain itself (as opposed to storage failures,
/// which surface as `eyre::Report` with context)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("invalid filter: {0:?} (expected one of: all, active, completed)")]
    InvalidFilter(String),

    #[error("invalid todo {0:?}: id and text must be non-empty")]
    InvalidTodo(String),

    #[error("invalid id strategy: {0:?} (expected one of: uuid, timestamp)")]
    InvalidIdStrategy(String),

    #[error("invalid backend: {0:?} (expected one of: file, sqlite)")]
    InvalidBackend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_message() {
        let err = TodoError::InvalidFilter("done".to_string());
        assert_eq!(
            err.to_string(),
            "invalid filter: \"done\" (expected one of: all, active, completed)"
        );
    }

    #[test]
    fn test_converts_into_report() {
        let report: eyre::Report = TodoError::InvalidBackend("redis".to_string()).into();
        assert!(report.to_string().contains("redis"));
        assert_eq!(
            report.downcast_ref::<TodoError>(),
            Some(&TodoError::InvalidBackend("redis".to_string()))
        );
    }
}
