//! Wire results for the list/read/get methods.

use serde::Serialize;

use mcp_dispatch::{CapabilityDescriptor, ContentItem, SchemaNode};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub input_schema: SchemaNode,
}

impl From<&CapabilityDescriptor> for ToolDefinition {
    fn from(d: &CapabilityDescriptor) -> Self {
        Self {
            name: d.name.clone(),
            title: d.title.clone(),
            description: d.description.clone(),
            input_schema: d.input_schema.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolListResult {
    pub tools: Vec<ToolDefinition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl From<&CapabilityDescriptor> for ResourceDefinition {
    fn from(d: &CapabilityDescriptor) -> Self {
        Self {
            uri: d.name.clone(),
            name: d.title.clone().unwrap_or_else(|| d.name.clone()),
            description: d.description.clone(),
            mime_type: d.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceListResult {
    pub resources: Vec<ResourceDefinition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContent>,
}

impl ReadResourceResult {
    /// Wrap handler output. Items without their own MIME type inherit the
    /// descriptor's.
    pub fn from_content(uri: &str, fallback_mime: Option<&str>, content: Vec<ContentItem>) -> Self {
        let contents = content
            .into_iter()
            .map(|item| ResourceContent {
                uri: uri.to_string(),
                mime_type: item.mime_type().or(fallback_mime).map(str::to_string),
                text: item.as_text().to_string(),
            })
            .collect();
        Self { contents }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

impl From<&CapabilityDescriptor> for PromptDefinition {
    fn from(d: &CapabilityDescriptor) -> Self {
        let schema = &d.input_schema;
        let arguments = schema
            .properties
            .iter()
            .map(|(name, node)| PromptArgument {
                name: name.clone(),
                description: node.description.clone(),
                required: schema.is_required(name),
            })
            .collect();
        Self {
            name: d.name.clone(),
            description: d.description.clone(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptListResult {
    pub prompts: Vec<PromptDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: ContentItem,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptGetResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

impl PromptGetResult {
    /// Every rendered item becomes one user-role message.
    pub fn from_content(description: &str, content: Vec<ContentItem>) -> Self {
        Self {
            description: description.to_string(),
            messages: content
                .into_iter()
                .map(|content| PromptMessage {
                    role: "user",
                    content,
                })
                .collect(),
        }
    }
}
