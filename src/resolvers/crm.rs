//! Resolvers backed by the `/crm/v1` panel endpoints.

use async_trait::async_trait;
use serde_json::Value;

use super::{as_plain_array, drain_pages, map_options, OptionPair, OptionResolver};
use crate::client::ApiClient;
use crate::error::{ConnectorError, Result};
use crate::fields::FieldValues;

pub struct Panels;

#[async_trait]
impl OptionResolver for Panels {
    fn name(&self) -> &'static str {
        "getPanels"
    }

    async fn resolve(&self, client: &ApiClient, _fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let items = drain_pages(client, "panels", "/crm/v1/panel", &[]).await?;
        Ok(map_options(&items, "title", "id"))
    }
}

pub struct StepsByPanel;

#[async_trait]
impl OptionResolver for StepsByPanel {
    fn name(&self) -> &'static str {
        "getStepsPanelId"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["panelId"]
    }

    async fn resolve(&self, client: &ApiClient, fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = panel_details(client, fields, "Steps", "steps").await?;
        let steps = data.get("steps").and_then(Value::as_array).cloned().unwrap_or_default();
        Ok(map_options(&steps, "title", "id"))
    }
}

pub struct TagsByPanel;

#[async_trait]
impl OptionResolver for TagsByPanel {
    fn name(&self) -> &'static str {
        "getTagsPanel"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["panelId"]
    }

    async fn resolve(&self, client: &ApiClient, fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = panel_details(client, fields, "Tags", "tags").await?;
        let tags = data.get("tags").and_then(Value::as_array).cloned().unwrap_or_default();
        Ok(map_options(&tags, "name", "id"))
    }
}

/// Panel custom fields. `GROUP` entries are containers, not settable
/// fields, and are filtered out.
pub struct CustomFieldsByPanel;

#[async_trait]
impl OptionResolver for CustomFieldsByPanel {
    fn name(&self) -> &'static str {
        "getCustomFieldsPanel"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["panelId"]
    }

    async fn resolve(&self, client: &ApiClient, fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let path = format!("/crm/v1/panel/{}/custom-fields", fields.str("panelId"));
        let data = client
            .get(&path, &[])
            .await
            .map_err(|e| ConnectorError::resolver("panel custom fields", e))?;

        let settable: Vec<Value> = as_plain_array(&data, "panel custom fields")?
            .iter()
            .filter(|field| field.get("type").and_then(Value::as_str) != Some("GROUP"))
            .cloned()
            .collect();
        Ok(map_options(&settable, "name", "id"))
    }
}

async fn panel_details(
    client: &ApiClient,
    fields: &FieldValues,
    include: &str,
    what: &str,
) -> Result<Value> {
    let path = format!("/crm/v1/panel/{}", fields.str("panelId"));
    let query = vec![("IncludeDetails".to_string(), include.to_string())];
    client
        .get(&path, &query)
        .await
        .map_err(|e| ConnectorError::resolver(what, e))
}
