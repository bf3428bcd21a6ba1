//! Agent Configuration
//!
//! Immutable settings consumed once when an agent is built. The model and
//! sampling fields are carried for callers that want them; routing ignores them.

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TOOLS: [&str; 2] = ["search", "calculator"];

fn default_tools() -> Vec<String> {
    DEFAULT_TOOLS.iter().map(|s| (*s).to_string()).collect()
}

/// Agent configuration
///
/// An empty tool list is replaced by [`DEFAULT_TOOLS`] at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAgentConfig")]
pub struct AgentConfig {
    model: String,
    temperature: f32,
    max_tokens: u32,
    tools: Vec<String>,
}

/// Deserialization shape: every field optional
#[derive(Deserialize)]
struct RawAgentConfig {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    #[serde(default)]
    tools: Vec<String>,
}

impl From<RawAgentConfig> for AgentConfig {
    fn from(raw: RawAgentConfig) -> Self {
        let mut builder = AgentConfig::builder().tools(raw.tools);
        if let Some(model) = raw.model {
            builder = builder.model(model);
        }
        if let Some(temperature) = raw.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = raw.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        builder.build()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AgentConfig {
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Parse from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from `AGENT_MODEL`, `AGENT_TEMPERATURE`, `AGENT_MAX_TOKENS` and
    /// `AGENT_TOOLS` (comma-separated).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AgentConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(model) = lookup("AGENT_MODEL").filter(|m| !m.trim().is_empty()) {
            builder = builder.model(model.trim());
        }

        if let Some(raw) = lookup("AGENT_TEMPERATURE") {
            match raw.trim().parse() {
                Ok(temperature) => builder = builder.temperature(temperature),
                Err(_) => tracing::warn!(value = %raw, "Ignoring unparsable AGENT_TEMPERATURE"),
            }
        }

        if let Some(raw) = lookup("AGENT_MAX_TOKENS") {
            match raw.trim().parse() {
                Ok(max_tokens) => builder = builder.max_tokens(max_tokens),
                Err(_) => tracing::warn!(value = %raw, "Ignoring unparsable AGENT_MAX_TOKENS"),
            }
        }

        if let Some(raw) = lookup("AGENT_TOOLS") {
            builder = builder.tools(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        }

        builder.build()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Enabled tool names, in configured order
    pub fn tools(&self) -> &[String] {
        &self.tools
    }
}

/// Builder for [`AgentConfig`]
#[derive(Clone, Debug)]
pub struct AgentConfigBuilder {
    model: String,
    temperature: f32,
    max_tokens: u32,
    tools: Vec<String>,
}

impl Default for AgentConfigBuilder {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            tools: Vec::new(),
        }
    }
}

impl AgentConfigBuilder {
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    #[must_use]
    pub fn tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }

    pub fn build(self) -> AgentConfig {
        let tools = if self.tools.is_empty() {
            default_tools()
        } else {
            self.tools
        };

        AgentConfig {
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools,
        }
    }
}
