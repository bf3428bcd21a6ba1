//! Service Kit - Agent Tools
//!
//! The tools this agent knows how to route to. Each implements
//! `agent_core::Tool`.

pub mod calculator;
pub mod search;

pub use calculator::CalculatorTool;
pub use search::SearchTool;
