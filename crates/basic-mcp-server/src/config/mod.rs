//! Configuration loading and resolution.
//!
//! Precedence is always: command-line flag, then environment, then default.

use mcp_dispatch::Category;

use crate::types::SERVER_VERSION;

pub const DEFAULT_SERVER_NAME: &str = "basic-mcp-server";

/// Overrides the advertised server name.
pub const NAME_ENV: &str = "BASIC_MCP_NAME";

/// Comma-separated categories to disable (`tools,prompts`).
pub const DISABLE_ENV: &str = "BASIC_MCP_DISABLE";

const DEFAULT_INSTRUCTIONS: &str = "Basic MCP server with a handful of demonstration capabilities. \
     Use tools for echo, arithmetic and the current time. \
     Read resources for a welcome message and server metadata. \
     Use the greeting prompt to open a conversation.";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("unknown capability category `{0}` (expected tools, resources or prompts)")]
    UnknownCategory(String),
}

/// Which capability categories are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySet {
    pub tools: bool,
    pub resources: bool,
    pub prompts: bool,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

impl CategorySet {
    pub fn all() -> Self {
        Self {
            tools: true,
            resources: true,
            prompts: true,
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Tool => self.tools,
            Category::Resource => self.resources,
            Category::Prompt => self.prompts,
        }
    }

    pub fn without(mut self, category: Category) -> Self {
        match category {
            Category::Tool => self.tools = false,
            Category::Resource => self.resources = false,
            Category::Prompt => self.prompts = false,
        }
        self
    }

    /// Enabled categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

/// Immutable server settings shared by every component.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub instructions: Option<String>,
    pub capabilities: CategorySet,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            instructions: Some(DEFAULT_INSTRUCTIONS.to_string()),
            capabilities: CategorySet::all(),
        }
    }
}

impl ServerConfig {
    /// Resolve from flags and the process environment.
    pub fn resolve(name: Option<&str>, disabled_by_flag: &[Category]) -> Result<Self, ConfigError> {
        let env_name = std::env::var(NAME_ENV).ok();
        let env_disabled = std::env::var(DISABLE_ENV).ok();
        Self::resolve_with(name, disabled_by_flag, env_name, env_disabled.as_deref())
    }

    /// Resolution with the environment passed in explicitly.
    pub fn resolve_with(
        name: Option<&str>,
        disabled_by_flag: &[Category],
        env_name: Option<String>,
        env_disabled: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let name = name
            .map(str::to_string)
            .or(env_name.filter(|n| !n.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string());

        let mut capabilities = CategorySet::all();
        let from_env = match env_disabled {
            Some(list) => parse_category_list(list)?,
            None => Vec::new(),
        };
        for category in disabled_by_flag.iter().chain(from_env.iter()) {
            capabilities = capabilities.without(*category);
        }

        Ok(Self {
            name,
            capabilities,
            ..Self::default()
        })
    }
}

/// Parse `tools, prompts` style lists. Singular and plural names are both
/// accepted; blanks are skipped.
pub fn parse_category_list(list: &str) -> Result<Vec<Category>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_category)
        .collect()
}

fn parse_category(raw: &str) -> Result<Category, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "tool" | "tools" => Ok(Category::Tool),
        "resource" | "resources" => Ok(Category::Resource),
        "prompt" | "prompts" => Ok(Category::Prompt),
        _ => Err(ConfigError::UnknownCategory(raw.to_string())),
    }
}
