//! Tool: calculate. Evaluates an arithmetic expression.

use serde::Deserialize;
use serde_json::Value;

use mcp_dispatch::{Arguments, CapabilityDescriptor, ContentItem, HandlerError, HandlerResult, SchemaNode};

use super::expression::{self, MAX_EXPRESSION_LEN};

#[derive(Debug, Deserialize)]
struct CalculateParams {
    expression: String,
}

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "calculate",
        "Evaluate an arithmetic expression using + - * / and parentheses",
        SchemaNode::object()
            .property(
                "expression",
                SchemaNode::string().describe(format!(
                    "Expression to evaluate, e.g. \"(2 + 3) * 4\" (at most {MAX_EXPRESSION_LEN} characters)"
                )),
            )
            .require(["expression"]),
    )
}

pub async fn execute(args: Arguments) -> HandlerResult {
    let params: CalculateParams = serde_json::from_value(Value::Object(args))?;
    let result = expression::evaluate(&params.expression)
        .map_err(|e| HandlerError::failed(format!("calculation error: {e}")))?;
    Ok(vec![ContentItem::text(format!(
        "{} = {result}",
        params.expression.trim()
    ))])
}
