//! Query Results

use serde::{Deserialize, Serialize};

use agent_core::{Result as CoreResult, SessionId};

/// Response text returned whenever routing fails
pub const APOLOGY: &str = "I apologize, but I encountered an error processing your request.";

/// Outcome of a query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Success,
    Error,
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Structured response to one query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Session that handled the query
    pub session_id: SessionId,

    /// The query, as received
    pub query: String,

    /// Text shown to the user
    pub response: String,

    pub status: QueryStatus,

    /// Failure description, only set when `status` is `Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    pub fn success(
        session_id: SessionId,
        query: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            query: query.into(),
            response: response.into(),
            status: QueryStatus::Success,
            error: None,
        }
    }

    pub fn failure(
        session_id: SessionId,
        query: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            query: query.into(),
            response: APOLOGY.into(),
            status: QueryStatus::Error,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
