//! Prompt: greeting. Opens a conversation with a named user.

use serde::Deserialize;
use serde_json::Value;

use mcp_dispatch::{Arguments, CapabilityDescriptor, ContentItem, HandlerResult, SchemaNode};

#[derive(Debug, Deserialize)]
struct GreetingArgs {
    name: String,
    #[serde(default)]
    time_of_day: Option<String>,
}

pub fn definition() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "greeting",
        "Start a conversation with a polite, time-appropriate greeting",
        SchemaNode::object()
            .property("name", SchemaNode::string().describe("Name of the person being greeted"))
            .property(
                "time_of_day",
                SchemaNode::string().describe("morning, afternoon, or evening"),
            )
            .require(["name"]),
    )
}

pub async fn expand(args: Arguments) -> HandlerResult {
    let args: GreetingArgs = serde_json::from_value(Value::Object(args))?;
    let salutation = salutation(args.time_of_day.as_deref());

    Ok(vec![ContentItem::text(format!(
        "{salutation}, {}. Thank you for stopping by today. \
         Please greet me warmly and ask how you can help.",
        args.name
    ))])
}

fn salutation(time_of_day: Option<&str>) -> &'static str {
    match time_of_day.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
        Some("morning") | Some("朝") => "Good morning",
        Some("afternoon") | Some("昼") => "Good afternoon",
        Some("evening") | Some("night") | Some("夜") => "Good evening",
        _ => "Hello",
    }
}
