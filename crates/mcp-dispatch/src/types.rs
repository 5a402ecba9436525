//! Core data types: categories, descriptors, requests, and envelopes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DispatchError, ErrorKind};
use crate::schema::SchemaNode;

/// Argument mapping passed to handlers.
pub type Arguments = Map<String, Value>;

/// The three capability categories a server can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tool,
    Resource,
    Prompt,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Tool, Category::Resource, Category::Prompt];

    /// Plural form used in capability advertisement (`tools`, `resources`, `prompts`).
    pub fn plural(self) -> &'static str {
        match self {
            Category::Tool => "tools",
            Category::Resource => "resources",
            Category::Prompt => "prompts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Tool => "tool",
            Category::Resource => "resource",
            Category::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

/// Declared metadata for one capability. Immutable once registered.
///
/// For resources, `name` holds the URI and `title` the display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub input_schema: SchemaNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl CapabilityDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: SchemaNode,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: description.into(),
            input_schema,
            mime_type: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A decoded capability request. Transient: built per message.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub category: Category,
    pub name: String,
    pub arguments: Option<Arguments>,
}

impl Request {
    pub fn new(category: Category, name: impl Into<String>, arguments: Option<Arguments>) -> Self {
        Self {
            category,
            name: name.into(),
            arguments,
        }
    }

    pub fn tool(name: impl Into<String>, arguments: Option<Arguments>) -> Self {
        Self::new(Category::Tool, name, arguments)
    }

    pub fn resource(uri: impl Into<String>) -> Self {
        Self::new(Category::Resource, uri, None)
    }

    pub fn prompt(name: impl Into<String>, arguments: Option<Arguments>) -> Self {
        Self::new(Category::Prompt, name, arguments)
    }
}

/// One item of envelope content. Only text is produced by this server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentItem {
    #[serde(rename = "text")]
    Text {
        text: String,
        #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        ContentItem::Text {
            text: text.into(),
            mime_type: None,
        }
    }

    pub fn text_with_mime(text: impl Into<String>, mime_type: impl Into<String>) -> Self {
        ContentItem::Text {
            text: text.into(),
            mime_type: Some(mime_type.into()),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentItem::Text { text, .. } => text,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            ContentItem::Text { mime_type, .. } => mime_type.as_deref(),
        }
    }
}

/// The structured success/error wrapper returned for every dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "isError")]
    pub is_error: bool,
    pub content: Vec<ContentItem>,
    #[serde(skip)]
    failure: Option<ErrorKind>,
}

impl ResponseEnvelope {
    pub fn success(content: Vec<ContentItem>) -> Self {
        Self {
            is_error: false,
            content,
            failure: None,
        }
    }

    pub fn failure(error: &DispatchError) -> Self {
        Self {
            is_error: true,
            content: vec![ContentItem::text(error.to_string())],
            failure: Some(error.kind()),
        }
    }

    /// Which failure produced this envelope, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure
    }

    /// All text content joined by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(ContentItem::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
