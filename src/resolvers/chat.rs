//! Resolvers backed by the `/chat/v1` endpoints: channels, chatbots and
//! message templates.

use async_trait::async_trait;
use serde_json::Value;

use super::{as_plain_array, drain_pages, fallback_label, map_options, OptionPair, OptionResolver};
use crate::client::ApiClient;
use crate::error::{ConnectorError, Result};
use crate::fields::FieldValues;

pub struct Channels;

#[async_trait]
impl OptionResolver for Channels {
    fn name(&self) -> &'static str {
        "getChannelsIds"
    }

    async fn resolve(&self, client: &ApiClient, _fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = client
            .get("/chat/v1/channel", &[])
            .await
            .map_err(|e| ConnectorError::resolver("channels", e))?;

        Ok(as_plain_array(&data, "channels")?
            .iter()
            .map(|channel| {
                let value = channel.get("id").cloned().unwrap_or(Value::Null);
                let human_id = channel
                    .pointer("/identity/humanId")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let platform = channel
                    .pointer("/identity/platform")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let label = match (human_id.is_empty(), platform.is_empty()) {
                    (false, false) => format!("{} {}", human_id, platform),
                    (false, true) => human_id.to_string(),
                    (true, false) => platform.to_string(),
                    (true, true) => fallback_label(&value),
                };
                OptionPair { label, value }
            })
            .collect())
    }
}

pub struct Bots;

#[async_trait]
impl OptionResolver for Bots {
    fn name(&self) -> &'static str {
        "getBots"
    }

    async fn resolve(&self, client: &ApiClient, _fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = client
            .get("/chat/v1/chatbot", &[])
            .await
            .map_err(|e| ConnectorError::resolver("bots", e))?;

        let items = data
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| ConnectorError::Resolver {
                what: "bots".to_string(),
                message: "unexpected response shape, expected items".to_string(),
            })?;
        Ok(map_options(items, "name", "id"))
    }
}

/// Templates for the chosen channel. The collection is paginated, so every
/// page is drained before any option is returned. The template name itself
/// is the stored value.
pub struct Templates;

#[async_trait]
impl OptionResolver for Templates {
    fn name(&self) -> &'static str {
        "getTemplates"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["channelId"]
    }

    async fn resolve(&self, client: &ApiClient, fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let base_query = vec![(
            "ChannelId".to_string(),
            fields.str("channelId").to_string(),
        )];
        let items = drain_pages(client, "templates", "/chat/v1/template", &base_query).await?;
        Ok(map_options(&items, "name", "name"))
    }
}

/// Parameter placeholders of the chosen template. Templates may repeat a
/// placeholder across content blocks, so names are de-duplicated keeping
/// the first occurrence.
pub struct TemplateParams;

#[async_trait]
impl OptionResolver for TemplateParams {
    fn name(&self) -> &'static str {
        "getTemplatesParams"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["channelId", "templateName"]
    }

    async fn resolve(&self, client: &ApiClient, fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let template_name = fields.str("templateName");
        let query = vec![
            ("ChannelId".to_string(), fields.str("channelId").to_string()),
            ("IncludeDetails".to_string(), "Params".to_string()),
            ("PageSize".to_string(), "100".to_string()),
            ("name".to_string(), template_name.to_string()),
        ];
        let data = client
            .get("/chat/v1/template", &query)
            .await
            .map_err(|e| ConnectorError::resolver("template parameters", e))?;

        let mut seen = Vec::new();
        let mut options = Vec::new();
        for template in data.get("items").and_then(Value::as_array).into_iter().flatten() {
            for param in template.get("params").and_then(Value::as_array).into_iter().flatten() {
                let Some(name) = param.get("name").and_then(Value::as_str) else {
                    continue;
                };
                if seen.iter().any(|s| s == name) {
                    continue;
                }
                seen.push(name.to_string());
                options.push(OptionPair::new(name, name));
            }
        }
        Ok(options)
    }
}
