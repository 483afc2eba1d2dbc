use serde_json::{json, Map, Value};

use super::{paging, RequestParts};
use crate::client::ApiClient;
use crate::error::{ConnectorError, Result};
use crate::fields::{fold_kv_pairs, BodyBuilder, FieldValues};

pub fn get_all_messages(fields: &FieldValues) -> Result<RequestParts> {
    let query = paging(fields)
        .push("sessionId", fields.str("sessionId"))
        .push_datetime("CreatedAt.After", fields.get("createdAtAfter"))
        .push_datetime("CreatedAt.Before", fields.get("createdAtBefore"))
        .push_datetime("UpdatedAt.After", fields.get("updatedAtAfter"))
        .push_datetime("UpdatedAt.Before", fields.get("updatedAtBefore"))
        .build();
    Ok(RequestParts { query, body: None })
}

pub fn send_message_text(fields: &FieldValues) -> Result<RequestParts> {
    let body = send_body(fields, json!({ "text": fields.str("textMessage") }));
    Ok(RequestParts {
        query: Vec::new(),
        body: Some(body),
    })
}

/// Resolves the chosen template through the template endpoint, then shapes
/// the send body around it. The lookup failing to produce a template is a
/// validation error; the send call never happens.
pub async fn build_send_template(
    client: &ApiClient,
    fields: &FieldValues,
) -> Result<RequestParts> {
    let channel_id = fields.str("channelId");
    let template_name = fields.str("templateName");

    let query = vec![
        ("ChannelId".to_string(), channel_id.to_string()),
        ("IncludeDetails".to_string(), "Params".to_string()),
        ("PageSize".to_string(), "100".to_string()),
        ("name".to_string(), template_name.to_string()),
    ];
    let data = client.get("/chat/v1/template", &query).await?;

    let template = data
        .get("items")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .find(|t| t.get("name").and_then(Value::as_str) == Some(template_name))
        })
        .cloned()
        .ok_or_else(|| {
            ConnectorError::validation(format!(
                "Template {:?} not found for the chosen channel",
                template_name
            ))
        })?;

    let parameters = fold_kv_pairs(fields.get("templateParams"));
    let mut inner = Map::new();
    inner.insert("templateName".to_string(), json!(template_name));
    if let Some(id) = template.get("id").filter(|v| !v.is_null()) {
        inner.insert("templateId".to_string(), id.clone());
    }
    if !parameters.is_empty() {
        inner.insert("parameters".to_string(), Value::Object(parameters));
    }

    let body = send_body(fields, Value::Object(inner));
    Ok(RequestParts {
        query: Vec::new(),
        body: Some(body),
    })
}

/// Common `/chat/v1/message/send` body. The `options` block is always sent
/// with its boolean defaults; scoping fields appear only when set.
fn send_body(fields: &FieldValues, inner: Value) -> Value {
    let department = json!({ "id": fields.str("departmentId") });
    let user = json!({ "id": fields.str("userIdByDepartment") });

    BodyBuilder::new()
        .set("from", fields.get("channelId").clone())
        .set("to", fields.get("numberToSend").clone())
        .set("body", inner)
        .set(
            "options",
            json!({
                "enableBot": fields.bool("enableBot"),
                "hiddenSession": fields.bool("hiddenSession"),
                "forceStartSession": fields.bool("forceStartSession"),
            }),
        )
        .set_if_truthy("department", truthy_wrapper(department, fields.str("departmentId")))
        .set_if_truthy("sessionId", fields.get("sessionId").clone())
        .set_if_truthy("botId", fields.get("botId").clone())
        .set_if_truthy("user", truthy_wrapper(user, fields.str("userIdByDepartment")))
        .build()
}

/// `{id: ""}` must not count as present; collapse the wrapper to null when
/// the inner id is blank so the truthy check drops it.
fn truthy_wrapper(wrapper: Value, inner_id: &str) -> Value {
    if inner_id.is_empty() {
        Value::Null
    } else {
        wrapper
    }
}
