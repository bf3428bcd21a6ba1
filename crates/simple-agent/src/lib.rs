//! # simple-agent
//!
//! A deterministic, single-turn agent. Each query is matched against keyword
//! rules and answered by at most one tool: a calculator or a mock search.
//!
//! ```text
//! query ──► calculator rule? ──yes──► CalculatorTool ──► "Result: 108"
//!                │ no
//!                ▼
//!           search rule? ─────yes──► SearchTool ──────► "Search results for ..."
//!                │ no
//!                ▼
//!           fallback listing the active tools
//! ```
//!
//! ```rust
//! use simple_agent::SimpleAgent;
//!
//! let agent = SimpleAgent::with_defaults();
//! let result = agent.process_query("Calculate 15 * 7 + 3");
//! assert_eq!(result.response, "Result: 108");
//! ```

pub mod agent;
pub mod error;
pub mod expr;
pub mod model;
pub mod svckit;

pub use agent::{SimpleAgent, SimpleAgentBuilder};
pub use error::{EvalError, EvalResult};
pub use model::{QueryResult, QueryStatus, APOLOGY};

/// Re-export tools for easy registration
pub mod tools {
    use agent_core::ToolRegistry;

    pub use crate::svckit::{CalculatorTool, SearchTool};

    /// Every tool implementation the agent can enable by name
    pub fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(SearchTool);
        registry.register(CalculatorTool);
        registry
    }
}
