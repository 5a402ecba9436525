//! Capability registry: declared metadata for every tool, resource, and prompt.

use std::collections::HashMap;

use crate::error::RegistryError;
use crate::schema::SchemaType;
use crate::types::{CapabilityDescriptor, Category};

#[derive(Debug, Default, Clone)]
struct CategoryEntries {
    ordered: Vec<CapabilityDescriptor>,
    index: HashMap<String, usize>,
}

/// Holds descriptors per category in registration order.
///
/// Populated once at startup. Lookups and listings are side-effect free and
/// stable across calls.
#[derive(Debug, Default, Clone)]
pub struct CapabilityRegistry {
    tools: CategoryEntries,
    resources: CategoryEntries,
    prompts: CategoryEntries,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self, category: Category) -> &CategoryEntries {
        match category {
            Category::Tool => &self.tools,
            Category::Resource => &self.resources,
            Category::Prompt => &self.prompts,
        }
    }

    fn entries_mut(&mut self, category: Category) -> &mut CategoryEntries {
        match category {
            Category::Tool => &mut self.tools,
            Category::Resource => &mut self.resources,
            Category::Prompt => &mut self.prompts,
        }
    }

    /// Register a descriptor. Names must be unique within a category and the
    /// root schema must describe an object.
    pub fn register(
        &mut self,
        category: Category,
        descriptor: CapabilityDescriptor,
    ) -> Result<(), RegistryError> {
        if let Some(t) = descriptor.input_schema.schema_type {
            if t != SchemaType::Object {
                return Err(RegistryError::InvalidSchema {
                    category,
                    name: descriptor.name,
                    reason: format!("root schema must be an object, not {t}"),
                });
            }
        }

        let entries = self.entries_mut(category);
        if entries.index.contains_key(&descriptor.name) {
            return Err(RegistryError::Duplicate {
                category,
                name: descriptor.name,
            });
        }

        tracing::debug!("Registered {category} `{}`", descriptor.name);
        entries
            .index
            .insert(descriptor.name.clone(), entries.ordered.len());
        entries.ordered.push(descriptor);
        Ok(())
    }

    /// All descriptors of a category, in registration order.
    pub fn list(&self, category: Category) -> &[CapabilityDescriptor] {
        &self.entries(category).ordered
    }

    pub fn get(&self, category: Category, name: &str) -> Option<&CapabilityDescriptor> {
        let entries = self.entries(category);
        entries.index.get(name).map(|&i| &entries.ordered[i])
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.entries(category).index.contains_key(name)
    }

    pub fn len(&self, category: Category) -> usize {
        self.entries(category).ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|&c| self.len(c) == 0)
    }
}
