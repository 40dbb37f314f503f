//! Error types for the conversational interface.

use whoatewhat_core::SplitError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("session lock poisoned: {0}")]
    SessionPoisoned(String),
    #[error(transparent)]
    Core(#[from] SplitError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use whoatewhat_core::AnalysisError;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::SessionPoisoned("boom".into()).to_string(),
            "session lock poisoned: boom"
        );
    }

    #[test]
    fn test_from_split_error() {
        let err: ChatError = SplitError::Analysis(AnalysisError::InvalidResponse).into();
        assert!(matches!(err, ChatError::Core(_)));
        assert_eq!(
            err.to_string(),
            "Receipt analysis failed: Invalid response from server"
        );
    }
}
