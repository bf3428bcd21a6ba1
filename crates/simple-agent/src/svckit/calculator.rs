//! Calculator Tool
//!
//! Evaluates arithmetic typed by the user. Input is first checked against a
//! character allow-list, then handed to the evaluator in `crate::expr`.

use agent_core::{
    tool::ParameterSchema,
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::error::{EvalError, EvalResult};
use crate::expr::{self, Value};

pub const NAME: &str = "calculator";

/// Characters accepted besides whitespace
const ALLOWED: &str = "0123456789+-*/().";

/// Tool for evaluating arithmetic expressions
#[derive(Clone, Copy, Debug, Default)]
pub struct CalculatorTool;

impl CalculatorTool {
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate and render as the user-facing string
    pub fn calculate(&self, expression: &str) -> String {
        self.run(expression).output
    }

    /// Check characters, then evaluate
    pub fn evaluate(&self, expression: &str) -> EvalResult<Value> {
        if !expression
            .chars()
            .all(|c| c.is_whitespace() || ALLOWED.contains(c))
        {
            return Err(EvalError::InvalidCharacters);
        }
        expr::evaluate(expression)
    }

    fn run(&self, expression: &str) -> ToolResult {
        match self.evaluate(expression) {
            Ok(value) => {
                tracing::info!("Calculated: {expression} = {value}");
                ToolResult::success(NAME, format!("Result: {value}")).with_data(value.to_json())
            }
            Err(EvalError::InvalidCharacters) => {
                ToolResult::failure(NAME, "Error: Invalid characters in expression")
            }
            Err(e) => {
                tracing::error!(error = %e, "Calculator error: {e}");
                ToolResult::failure(NAME, format!("Error: Could not calculate '{expression}'"))
            }
        }
    }
}

impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Evaluate an arithmetic expression using + - * / and parentheses".into(),
            parameters: vec![ParameterSchema::required_string(
                "expression",
                "Expression to evaluate (e.g., '2 + 2', '(10 - 4) / 3')",
            )],
            category: Some("math".into()),
            has_side_effects: false,
        }
    }

    fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let expression = call.require_str("expression")?;
        Ok(self.run(expression))
    }
}
