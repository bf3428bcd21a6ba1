//! Tool System
//!
//! Named, stateless capabilities the agent can dispatch a query to.
//! Tools are registered by name and looked up by the router.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    pub arguments: HashMap<String, serde_json::Value>,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            id: None,
        }
    }

    /// Add an argument
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Get a string argument
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.str_arg(key).ok_or_else(|| {
            AgentError::ToolValidation(format!("Missing string argument '{key}' for tool '{}'", self.name))
        })
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error text)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

impl ParameterSchema {
    /// Required string parameter
    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: true,
        }
    }
}

/// Tool definition schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

/// Tool trait - implement to add new capabilities
///
/// Tools must hold no per-call mutable state so one instance can serve
/// concurrent callers.
pub trait Tool: Send + Sync {
    /// Get the tool's schema
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate arguments before execution
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Registry for available tools
///
/// Iteration order is registration order.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_boxed(Arc::new(tool));
    }

    /// Register a shared tool. Re-registering a name replaces the tool in place.
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Build a registry holding only `names` that are registered here, in the
    /// order given. Unknown names are skipped.
    #[must_use]
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let mut selected = Self::new();
        for name in names {
            if let Some(tool) = self.get(name.as_ref()) {
                selected.register_boxed(tool);
            }
        }
        selected
    }

    /// Execute a tool call
    pub fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        tool.validate(call)?;

        let mut result = tool.execute(call)?;
        if result.id.is_none() {
            result.id.clone_from(&call.id);
        }
        Ok(result)
    }

    /// Get all tool schemas
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.schema())
            .collect()
    }

    /// Get tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool(&'static str);

    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.0.into(),
                description: "Echo the input back".into(),
                parameters: vec![ParameterSchema::required_string("text", "Text to echo")],
                category: None,
                has_side_effects: false,
            }
        }

        fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call.require_str("text")?;
            Ok(ToolResult::success(self.0, text))
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool("alpha"));
        registry.register(EchoTool("beta"));
        registry.register(EchoTool("gamma"));
        registry
    }

    #[test]
    fn test_tool_registry() {
        let registry = registry();

        assert_eq!(registry.len(), 3);
        assert!(registry.get("alpha").is_some());
        assert!(registry.contains("beta"));
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.names(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_reregister_keeps_position() {
        let mut registry = registry();
        registry.register(EchoTool("alpha"));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_select_follows_requested_order() {
        let selected = registry().select(&["gamma", "nope", "alpha"]);

        assert_eq!(selected.names(), vec!["gamma", "alpha"]);
        assert!(!selected.contains("beta"));
    }

    #[test]
    fn test_select_nothing() {
        let selected = registry().select::<&str>(&[]);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_execute() {
        let call = ToolCall::new("beta").with_arg("text", "hi").with_id("call-1");
        let result = registry().execute(&call).unwrap();

        assert!(result.success);
        assert_eq!(result.output, "hi");
        assert_eq!(result.id.as_deref(), Some("call-1"));
    }

    #[test]
    fn test_execute_unknown_tool() {
        let err = registry().execute(&ToolCall::new("delta")).unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(name) if name == "delta"));
    }

    #[test]
    fn test_execute_missing_argument() {
        let err = registry().execute(&ToolCall::new("alpha")).unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));
    }

    #[test]
    fn test_schemas_in_order() {
        let names: Vec<String> = registry().schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }
}
