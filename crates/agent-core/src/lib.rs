//! # agent-core
//!
//! Core plumbing for rule-based, tool-using agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Router    │  │    Tools    │  │   Log sink          │  │
//! │  │ (keywords)  │──│   Registry  │  │   (Dispatch)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate owns the pieces every agent shares: the `Tool` trait and its
//! registry, configuration, session identity, errors and logging setup.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod tool;

pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use logging::{LogConfig, MemorySink};
pub use session::{Session, SessionId};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
