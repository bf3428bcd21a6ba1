//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Whether the failure originated inside a tool
    pub const fn is_tool_error(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound(_) | Self::ToolValidation(_) | Self::ToolExecution(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AgentError::ToolNotFound("weather".into());
        assert_eq!(err.to_string(), "Tool not found: weather");

        let err = AgentError::Config("bad value".into());
        assert_eq!(err.to_string(), "Configuration error: bad value");
    }

    #[test]
    fn test_tool_error_classification() {
        assert!(AgentError::ToolExecution("boom".into()).is_tool_error());
        assert!(!AgentError::Config("boom".into()).is_tool_error());
    }
}
