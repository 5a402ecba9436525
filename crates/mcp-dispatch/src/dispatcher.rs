//! Request dispatch: resolve, validate, invoke, wrap.
//!
//! [`Dispatcher::dispatch`] is total. Every failure, including a panic inside
//! a handler body, comes back as an error-flagged [`ResponseEnvelope`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde_json::Value;

use crate::error::{DispatchError, DispatchResult, RegistryError};
use crate::handler::{CapabilityHandler, HandlerTable};
use crate::registry::CapabilityRegistry;
use crate::types::{Arguments, CapabilityDescriptor, Category, ContentItem, Request, ResponseEnvelope};
use crate::validator::validate;

/// Routes capability requests to their handlers.
#[derive(Debug)]
pub struct Dispatcher {
    registry: CapabilityRegistry,
    handlers: HandlerTable,
}

impl Dispatcher {
    /// Build a dispatcher from a registry and a handler table.
    ///
    /// Every descriptor must resolve to exactly one handler in the same
    /// category, and every handler must have a descriptor.
    pub fn new(registry: CapabilityRegistry, handlers: HandlerTable) -> Result<Self, RegistryError> {
        for category in Category::ALL {
            if let Some(missing) = registry
                .list(category)
                .iter()
                .find(|d| !handlers.contains(category, &d.name))
            {
                return Err(RegistryError::MissingHandler {
                    category,
                    name: missing.name.clone(),
                });
            }

            if let Some(orphan) = handlers
                .names(category)
                .find(|name| !registry.contains(category, name))
            {
                return Err(RegistryError::MissingDescriptor {
                    category,
                    name: orphan.to_string(),
                });
            }
        }

        Ok(Self { registry, handlers })
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Descriptors of a category in registration order.
    pub fn list(&self, category: Category) -> &[CapabilityDescriptor] {
        self.registry.list(category)
    }

    pub fn describe(&self, category: Category, name: &str) -> Option<&CapabilityDescriptor> {
        self.registry.get(category, name)
    }

    /// Dispatch one request. Never fails past this boundary.
    pub async fn dispatch(&self, request: Request) -> ResponseEnvelope {
        let started = Instant::now();
        let category = request.category;
        let name = request.name.clone();
        let audit = redact_arguments(request.arguments.as_ref());

        let envelope = match self.try_dispatch(request).await {
            Ok(content) => ResponseEnvelope::success(content),
            Err(e) => {
                tracing::warn!("{category} `{name}` failed: {e}");
                ResponseEnvelope::failure(&e)
            }
        };

        tracing::info!(
            category = %category,
            name = %name,
            arguments = %audit,
            outcome = if envelope.is_error { "failure" } else { "success" },
            elapsed_ms = started.elapsed().as_millis() as u64,
            "capability dispatched"
        );

        envelope
    }

    async fn try_dispatch(&self, request: Request) -> DispatchResult<Vec<ContentItem>> {
        let Request {
            category,
            name,
            arguments,
        } = request;

        let descriptor = self
            .registry
            .get(category, &name)
            .ok_or_else(|| not_found(category, &name))?;

        validate(&descriptor.input_schema, arguments.as_ref())?;

        let handler = self
            .handlers
            .get(category, &name)
            .ok_or_else(|| not_found(category, &name))?;

        let arguments = arguments.unwrap_or_default();
        match AssertUnwindSafe(handler.invoke(arguments)).catch_unwind().await {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(e)) => Err(DispatchError::HandlerFailure(e.to_string())),
            Err(panic) => Err(DispatchError::HandlerFailure(panic_message(panic))),
        }
    }
}

fn not_found(category: Category, name: &str) -> DispatchError {
    match category {
        Category::Resource => DispatchError::ResourceNotFound(name.to_string()),
        Category::Tool | Category::Prompt => DispatchError::UnknownCapability(name.to_string()),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// Registers descriptors together with their handlers, so the one-to-one
/// invariant holds by construction.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    registry: CapabilityRegistry,
    handlers: HandlerTable,
}

impl DispatcherBuilder {
    pub fn register(
        mut self,
        category: Category,
        descriptor: CapabilityDescriptor,
        handler: impl CapabilityHandler + 'static,
    ) -> Result<Self, RegistryError> {
        let name = descriptor.name.clone();
        self.registry.register(category, descriptor)?;
        self.handlers.insert(category, name, Arc::new(handler))?;
        Ok(self)
    }

    pub fn tool(
        self,
        descriptor: CapabilityDescriptor,
        handler: impl CapabilityHandler + 'static,
    ) -> Result<Self, RegistryError> {
        self.register(Category::Tool, descriptor, handler)
    }

    pub fn resource(
        self,
        descriptor: CapabilityDescriptor,
        handler: impl CapabilityHandler + 'static,
    ) -> Result<Self, RegistryError> {
        self.register(Category::Resource, descriptor, handler)
    }

    pub fn prompt(
        self,
        descriptor: CapabilityDescriptor,
        handler: impl CapabilityHandler + 'static,
    ) -> Result<Self, RegistryError> {
        self.register(Category::Prompt, descriptor, handler)
    }

    pub fn build(self) -> Result<Dispatcher, RegistryError> {
        Dispatcher::new(self.registry, self.handlers)
    }
}

const REDACTED: &str = "[REDACTED]";

fn redact_arguments(arguments: Option<&Arguments>) -> Value {
    match arguments {
        Some(map) => redact_value(&Value::Object(map.clone())),
        None => Value::Null,
    }
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String(REDACTED.to_string()))
                    } else {
                        (key.clone(), redact_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "api_key" | "apikey"
    ) || ["token", "secret", "password", "credential"]
        .iter()
        .any(|needle| normalized.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, HandlerError};
    use crate::handler::FnHandler;
    use crate::schema::SchemaNode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn args(value: Value) -> Option<Arguments> {
        value.as_object().cloned()
    }

    fn add_descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor::new(
            "add",
            "Add two numbers",
            SchemaNode::object()
                .property("a", SchemaNode::number())
                .property("b", SchemaNode::number())
                .require(["a", "b"]),
        )
    }

    async fn add(arguments: Arguments) -> Result<Vec<ContentItem>, HandlerError> {
        let a = arguments["a"].as_f64().unwrap_or_default();
        let b = arguments["b"].as_f64().unwrap_or_default();
        Ok(vec![ContentItem::text(format!("{a} + {b} = {}", a + b))])
    }

    fn counting_dispatcher(calls: Arc<AtomicUsize>) -> Dispatcher {
        let spy = FnHandler::new(move |arguments: Arguments| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                add(arguments).await
            }
        });
        Dispatcher::builder()
            .tool(add_descriptor(), spy)
            .unwrap()
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(calls.clone());

        let envelope = dispatcher
            .dispatch(Request::tool("add", args(json!({ "a": 2, "b": 3 }))))
            .await;
        assert!(!envelope.is_error);
        assert_eq!(envelope.text(), "2 + 3 = 5");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_name_never_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(calls.clone());

        let envelope = dispatcher
            .dispatch(Request::tool("subtract", args(json!({ "a": 2, "b": 3 }))))
            .await;
        assert!(envelope.is_error);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::UnknownCapability));
        assert!(envelope.text().contains("subtract"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_required_never_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting_dispatcher(calls.clone());

        let envelope = dispatcher
            .dispatch(Request::tool("add", args(json!({ "a": 2 }))))
            .await;
        assert!(envelope.is_error);
        assert_eq!(envelope.error_kind(), Some(ErrorKind::Validation));
        assert!(envelope.text().contains("missing required argument `b`"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_error_and_panic_become_envelopes() {
        let failing = FnHandler::new(|_arguments: Arguments| async {
            Err::<Vec<ContentItem>, _>(HandlerError::failed("disk on fire"))
        });
        let panicking = FnHandler::new(|_arguments: Arguments| async {
            if true {
                panic!("boom");
            }
            Ok::<_, HandlerError>(Vec::new())
        });
        let dispatcher = Dispatcher::builder()
            .tool(CapabilityDescriptor::new("fail", "fails", SchemaNode::object()), failing)
            .unwrap()
            .tool(CapabilityDescriptor::new("panic", "panics", SchemaNode::object()), panicking)
            .unwrap()
            .build()
            .unwrap();

        let failed = dispatcher.dispatch(Request::tool("fail", None)).await;
        assert_eq!(failed.error_kind(), Some(ErrorKind::HandlerFailure));
        assert_eq!(failed.text(), "handler failed: disk on fire");

        let panicked = dispatcher.dispatch(Request::tool("panic", None)).await;
        assert_eq!(panicked.error_kind(), Some(ErrorKind::HandlerFailure));
        assert!(panicked.text().contains("boom"));

        // The dispatcher keeps serving after a panic.
        let again = dispatcher.dispatch(Request::tool("fail", None)).await;
        assert!(again.is_error);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let dispatcher = Dispatcher::builder().build().unwrap();
        let envelope = dispatcher.dispatch(Request::resource("bogus://x")).await;
        assert_eq!(envelope.error_kind(), Some(ErrorKind::ResourceNotFound));
        assert_eq!(envelope.text(), "resource not found: bogus://x");
    }

    #[test]
    fn test_new_rejects_descriptor_without_handler() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Category::Tool, add_descriptor()).unwrap();
        let err = Dispatcher::new(registry, HandlerTable::new()).unwrap_err();
        assert!(matches!(err, RegistryError::MissingHandler { .. }));
    }

    #[test]
    fn test_new_rejects_handler_without_descriptor() {
        let mut handlers = HandlerTable::new();
        handlers
            .insert(Category::Prompt, "greeting", Arc::new(FnHandler::new(add)))
            .unwrap();
        let err = Dispatcher::new(CapabilityRegistry::new(), handlers).unwrap_err();
        assert!(matches!(err, RegistryError::MissingDescriptor { .. }));
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let result = Dispatcher::builder()
            .tool(add_descriptor(), FnHandler::new(add))
            .and_then(|b| b.tool(add_descriptor(), FnHandler::new(add)));
        assert!(matches!(result, Err(RegistryError::Duplicate { .. })));
    }

    #[test]
    fn test_redaction() {
        let redacted = redact_arguments(args(json!({
            "message": "hi",
            "api_key": "k",
            "nested": { "refresh_token": "t", "keep": 1 }
        }))
        .as_ref());
        assert_eq!(redacted["message"], json!("hi"));
        assert_eq!(redacted["api_key"], json!(REDACTED));
        assert_eq!(redacted["nested"]["refresh_token"], json!(REDACTED));
        assert_eq!(redacted["nested"]["keep"], json!(1));
    }
}
