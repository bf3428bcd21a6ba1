//! Keyword Router
//!
//! Single-turn routing: the first rule that matches decides which tool, if
//! any, answers the query. Calculator rules are checked before search rules.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::Dispatch;

use agent_core::{AgentConfig, AgentError, Result, Session, SessionId, Tool, ToolCall, ToolRegistry};

use crate::model::QueryResult;
use crate::svckit::{calculator, search};

/// Substrings of the raw query that send it to the calculator
const CALCULATOR_OPERATORS: [&str; 4] = ["+", "-", "*", "/"];

/// Substrings of the lowercased query that send it to the calculator
const CALCULATOR_KEYWORDS: [&str; 2] = ["calculate", "math"];

/// Substrings of the lowercased query that send it to search
const SEARCH_KEYWORDS: [&str; 4] = ["search", "find", "what is", "tell me about"];

const EXPRESSION_MARKER: &str = "calculate";

/// Rule-based agent dispatching each query to at most one tool
pub struct SimpleAgent {
    session: Session,
    config: AgentConfig,
    tools: ToolRegistry,
    log: Option<Dispatch>,
}

impl std::fmt::Debug for SimpleAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleAgent")
            .field("session", &self.session)
            .field("config", &self.config)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl SimpleAgent {
    /// Create an agent with the built-in tools enabled by `config`
    pub fn new(config: AgentConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn with_defaults() -> Self {
        Self::new(AgentConfig::default())
    }

    pub fn builder() -> SimpleAgentBuilder {
        SimpleAgentBuilder::default()
    }

    pub const fn session_id(&self) -> &SessionId {
        &self.session.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.session.created_at
    }

    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Active tools
    pub const fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Active tool names, in configured order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.names()
    }

    /// Answer a query. Never fails; routing errors come back as an
    /// error-status result.
    pub fn process_query(&self, query: &str) -> QueryResult {
        self.in_scope(|| {
            tracing::info!(session_id = %self.session.id, "Processing query: {query}");

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.route(query)))
                .unwrap_or_else(|payload| Err(AgentError::ToolExecution(panic_message(payload.as_ref()))));

            match outcome {
                Ok(response) => {
                    tracing::info!(session_id = %self.session.id, "Query processed successfully");
                    QueryResult::success(self.session.id.clone(), query, response)
                }
                Err(e) => {
                    tracing::error!(
                        session_id = %self.session.id,
                        tool_error = e.is_tool_error(),
                        "Error processing query: {e}"
                    );
                    QueryResult::failure(self.session.id.clone(), query, e.to_string())
                }
            }
        })
    }

    fn route(&self, query: &str) -> Result<String> {
        let lowered = query.to_lowercase();

        if wants_calculator(query, &lowered) && self.tools.contains(calculator::NAME) {
            let call = ToolCall::new(calculator::NAME).with_arg("expression", extract_expression(query));
            return Ok(self.tools.execute(&call)?.output);
        }

        if wants_search(&lowered) && self.tools.contains(search::NAME) {
            let call = ToolCall::new(search::NAME).with_arg("query", query);
            return Ok(self.tools.execute(&call)?.output);
        }

        Ok(self.fallback(query))
    }

    fn fallback(&self, query: &str) -> String {
        let names = self
            .tools
            .names()
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "I understand you're asking: '{query}'. I have access to these tools: [{names}]. \
             Try asking me to search for something or calculate a math expression!"
        )
    }

    fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.log {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

fn wants_calculator(query: &str, lowered: &str) -> bool {
    CALCULATOR_OPERATORS.iter().any(|op| query.contains(op))
        || CALCULATOR_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

fn wants_search(lowered: &str) -> bool {
    SEARCH_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Text after the last "calculate" (any case), or the whole query
fn extract_expression(query: &str) -> &str {
    // ASCII folding keeps byte offsets aligned with `query`
    let folded = query.to_ascii_lowercase();
    folded
        .rfind(EXPRESSION_MARKER)
        .map_or(query, |idx| &query[idx + EXPRESSION_MARKER.len()..])
        .trim()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".into());
    format!("tool panicked: {detail}")
}

/// Builder for [`SimpleAgent`]
pub struct SimpleAgentBuilder {
    config: AgentConfig,
    known_tools: ToolRegistry,
    log: Option<Dispatch>,
}

impl Default for SimpleAgentBuilder {
    fn default() -> Self {
        Self {
            config: AgentConfig::default(),
            known_tools: crate::tools::registry(),
            log: None,
        }
    }
}

impl SimpleAgentBuilder {
    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the set of tool implementations the configured names are
    /// resolved against
    #[must_use]
    pub fn known_tools(mut self, tools: ToolRegistry) -> Self {
        self.known_tools = tools;
        self
    }

    /// Add or override one known tool implementation
    #[must_use]
    pub fn known_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.known_tools.register_boxed(tool);
        self
    }

    /// Scope all of the agent's log output to `dispatch` instead of the
    /// global subscriber
    #[must_use]
    pub fn log_sink(mut self, dispatch: Dispatch) -> Self {
        self.log = Some(dispatch);
        self
    }

    pub fn build(self) -> SimpleAgent {
        let tools = self.known_tools.select(self.config.tools());

        let agent = SimpleAgent {
            session: Session::new(),
            config: self.config,
            tools,
            log: self.log,
        };

        agent.in_scope(|| {
            tracing::info!(
                session_id = %agent.session.id,
                tools = ?agent.tool_names(),
                "Agent initialized with session {}",
                agent.session.id
            );
        });

        agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_calculator() {
        assert!(wants_calculator("2+2", "2+2"));
        assert!(wants_calculator("Calculate this", "calculate this"));
        assert!(wants_calculator("MATH time", "math time"));
        assert!(wants_calculator("a - b", "a - b"));
        assert!(!wants_calculator("hello", "hello"));
    }

    #[test]
    fn test_wants_search() {
        assert!(wants_search("what is rust?"));
        assert!(wants_search("please find my keys"));
        assert!(wants_search("tell me about tokio"));
        assert!(!wants_search("tell me a joke"));
    }

    #[test]
    fn test_extract_expression() {
        assert_eq!(extract_expression("Calculate 15 * 7 + 3"), "15 * 7 + 3");
        assert_eq!(extract_expression("calculate 1 then CALCULATE  2+2 "), "2+2");
        assert_eq!(extract_expression("  3 * 3  "), "3 * 3");
        assert_eq!(extract_expression("calculate"), "");
    }

    #[test]
    fn test_extract_expression_non_ascii_prefix() {
        assert_eq!(extract_expression("Ünïcode calculate 1+1"), "1+1");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("kaboom");
        assert_eq!(panic_message(payload.as_ref()), "tool panicked: kaboom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "tool panicked: owned");

        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "tool panicked: unknown panic");
    }

    #[test]
    fn test_agent_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimpleAgent>();
    }
}
