//! Search Tool
//!
//! Mock search. The result set is fixed; only the header echoes the query.

use agent_core::{
    tool::ParameterSchema,
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

pub const NAME: &str = "search";

const RESULTS: [&str; 3] = [
    "Agent systems require careful monitoring and evaluation.",
    "Production deployments need robust error handling.",
    "Tool integration is a key component of agent architecture.",
];

/// Tool returning canned search results
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchTool;

impl SearchTool {
    pub const fn new() -> Self {
        Self
    }

    /// Run a search and render the results
    pub fn search(&self, query: &str) -> String {
        tracing::info!(query = %query, "Searching for: {query}");

        let mut output = format!("Search results for '{query}':");
        for result in RESULTS {
            output.push_str("\n- ");
            output.push_str(result);
        }
        output
    }
}

impl Tool for SearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Search for information. Returns a short list of matching results.".into(),
            parameters: vec![ParameterSchema::required_string("query", "What to search for")],
            category: Some("information".into()),
            has_side_effects: false,
        }
    }

    fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.require_str("query")?;
        Ok(ToolResult::success(NAME, self.search(query)).with_data(serde_json::json!(RESULTS)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_output() {
        let output = SearchTool.search("MLflow");
        let mut lines = output.lines();

        assert_eq!(lines.next(), Some("Search results for 'MLflow':"));
        let results: Vec<&str> = lines.collect();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|line| line.starts_with("- ")));
        assert_eq!(results[0], "- Agent systems require careful monitoring and evaluation.");
    }

    #[test]
    fn test_results_ignore_query() {
        let a = SearchTool.search("rust");
        let b = SearchTool.search("python");
        assert_eq!(a.lines().skip(1).collect::<Vec<_>>(), b.lines().skip(1).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_query() {
        assert!(SearchTool.search("").starts_with("Search results for '':\n"));
    }

    #[test]
    fn test_execute() {
        let call = ToolCall::new(NAME).with_arg("query", "agents");
        let result = SearchTool.execute(&call).unwrap();

        assert!(result.success);
        assert!(result.output.starts_with("Search results for 'agents':"));
        assert_eq!(result.data.unwrap().as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_execute_missing_query() {
        let err = SearchTool.execute(&ToolCall::new(NAME)).unwrap_err();
        assert!(matches!(err, agent_core::AgentError::ToolValidation(_)));
    }
}
