//! Dynamic option loading for selector fields. Each resolver queries the
//! remote API for the current universe of valid values and maps raw objects
//! to `(label, value)` pairs in API page order.

mod chat;
mod core;
mod crm;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::{ConnectorError, Result};
use crate::fields::{is_truthy, FieldValues};

/// One selectable choice. Serialized as `{name, value}`, which is what the
/// host expects for dropdown entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionPair {
    #[serde(rename = "name")]
    pub label: String,
    pub value: Value,
}

impl OptionPair {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        OptionPair {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
pub trait OptionResolver: Send + Sync {
    /// Identifier the host uses to invoke this resolver.
    fn name(&self) -> &'static str;

    /// Fields that must be set before this resolver can run.
    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    async fn resolve(&self, client: &ApiClient, fields: &FieldValues) -> Result<Vec<OptionPair>>;
}

/// Lookup table of every resolver, keyed by host-facing name.
pub struct ResolverRegistry {
    resolvers: HashMap<&'static str, Box<dyn OptionResolver>>,
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverRegistry {
    pub fn new() -> Self {
        let mut registry = ResolverRegistry {
            resolvers: HashMap::new(),
        };
        registry.register(Box::new(core::Departments));
        registry.register(Box::new(core::Users));
        registry.register(Box::new(core::UsersByDepartment));
        registry.register(Box::new(core::Tags));
        registry.register(Box::new(core::CustomFields));
        registry.register(Box::new(chat::Channels));
        registry.register(Box::new(chat::Bots));
        registry.register(Box::new(chat::Templates));
        registry.register(Box::new(chat::TemplateParams));
        registry.register(Box::new(crm::Panels));
        registry.register(Box::new(crm::StepsByPanel));
        registry.register(Box::new(crm::TagsByPanel));
        registry.register(Box::new(crm::CustomFieldsByPanel));
        registry
    }

    fn register(&mut self, resolver: Box<dyn OptionResolver>) {
        self.resolvers.insert(resolver.name(), resolver);
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.resolvers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Runs the named resolver. Unmet dependencies are reported before any
    /// network call is made; a partially-paginated failure discards all
    /// accumulated options.
    pub async fn resolve(
        &self,
        name: &str,
        client: &ApiClient,
        fields: &FieldValues,
    ) -> Result<Vec<OptionPair>> {
        let resolver = self
            .resolvers
            .get(name)
            .ok_or_else(|| ConnectorError::validation(format!("Unknown resolver: {}", name)))?;

        for dependency in resolver.depends_on() {
            if !is_truthy(fields.get(dependency)) {
                return Err(ConnectorError::MissingDependency(dependency));
            }
        }

        tracing::debug!(resolver = name, "loading options");
        resolver.resolve(client, fields).await
    }
}

/// Drains a `{items, hasMorePages}` collection endpoint, one page at a time
/// starting at page 1, stopping exactly when `hasMorePages` is false.
pub(crate) async fn drain_pages(
    client: &ApiClient,
    what: &str,
    path: &str,
    base_query: &[(String, String)],
) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    let mut page: u32 = 1;
    loop {
        let mut query = base_query.to_vec();
        query.push(("pageNumber".to_string(), page.to_string()));
        let data = client
            .get(path, &query)
            .await
            .map_err(|e| ConnectorError::resolver(what, e))?;

        if let Some(chunk) = data.get("items").and_then(Value::as_array) {
            items.extend(chunk.iter().cloned());
        }
        if !data.get("hasMorePages").and_then(Value::as_bool).unwrap_or(false) {
            break;
        }
        page += 1;
    }
    Ok(items)
}

/// Maps raw API objects to option pairs. A missing label degrades to the
/// raw value; a missing value becomes null rather than being skipped.
pub(crate) fn map_options(items: &[Value], label_field: &str, value_field: &str) -> Vec<OptionPair> {
    items
        .iter()
        .map(|item| {
            let value = item.get(value_field).cloned().unwrap_or(Value::Null);
            let label = item
                .get(label_field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| fallback_label(&value));
            OptionPair { label, value }
        })
        .collect()
}

pub(crate) fn fallback_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Expects endpoints that answer with a bare JSON array.
pub(crate) fn as_plain_array<'a>(data: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    data.as_array().ok_or_else(|| ConnectorError::Resolver {
        what: what.to_string(),
        message: "unexpected response shape, expected an array".to_string(),
    })
}
