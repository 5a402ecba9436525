//! Handler interface and per-category handler tables.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{HandlerError, RegistryError};
use crate::types::{Arguments, Category, ContentItem};

/// Result of one handler invocation.
pub type HandlerResult = Result<Vec<ContentItem>, HandlerError>;

/// The fixed interface every tool, resource, and prompt body implements.
///
/// Handlers receive arguments that already passed schema validation. They
/// never touch the transport; they only return content.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    async fn invoke(&self, arguments: Arguments) -> HandlerResult;
}

/// Adapts an async function or closure into a [`CapabilityHandler`].
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> CapabilityHandler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn invoke(&self, arguments: Arguments) -> HandlerResult {
        (self.func)(arguments).await
    }
}

/// Maps capability names to handlers, one table per category.
#[derive(Default, Clone)]
pub struct HandlerTable {
    tools: HashMap<String, Arc<dyn CapabilityHandler>>,
    resources: HashMap<String, Arc<dyn CapabilityHandler>>,
    prompts: HashMap<String, Arc<dyn CapabilityHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, category: Category) -> &HashMap<String, Arc<dyn CapabilityHandler>> {
        match category {
            Category::Tool => &self.tools,
            Category::Resource => &self.resources,
            Category::Prompt => &self.prompts,
        }
    }

    fn table_mut(&mut self, category: Category) -> &mut HashMap<String, Arc<dyn CapabilityHandler>> {
        match category {
            Category::Tool => &mut self.tools,
            Category::Resource => &mut self.resources,
            Category::Prompt => &mut self.prompts,
        }
    }

    pub fn insert(
        &mut self,
        category: Category,
        name: impl Into<String>,
        handler: Arc<dyn CapabilityHandler>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let table = self.table_mut(category);
        if table.contains_key(&name) {
            return Err(RegistryError::Duplicate { category, name });
        }
        table.insert(name, handler);
        Ok(())
    }

    pub fn get(&self, category: Category, name: &str) -> Option<&Arc<dyn CapabilityHandler>> {
        self.table(category).get(name)
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.table(category).contains_key(name)
    }

    pub fn names(&self, category: Category) -> impl Iterator<Item = &str> {
        self.table(category).keys().map(String::as_str)
    }

    pub fn len(&self, category: Category) -> usize {
        self.table(category).len()
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("tools", &self.tools.len())
            .field("resources", &self.resources.len())
            .field("prompts", &self.prompts.len())
            .finish()
    }
}
