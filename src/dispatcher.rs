use serde::Serialize;
use serde_json::Value;

use crate::catalog::{self, Operation, RequestTemplate, Resource, ResponseKind};
use crate::client::ApiClient;
use crate::error::{ConnectorError, Result};
use crate::fields::FieldValues;
use crate::operations;

/// One normalized API response item. Operations always return the full
/// ordered sequence, even when it holds a single element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub json: Value,
}

/// Runs one `(resource, operation)` invocation: validates input, issues
/// exactly one outbound call (two for the template send, which performs a
/// lookup first) and normalizes the response.
pub async fn execute(
    client: &ApiClient,
    resource: Resource,
    operation: Operation,
    fields: &FieldValues,
) -> Result<Vec<ResultRecord>> {
    let template = catalog::lookup(resource, operation).ok_or_else(|| {
        ConnectorError::validation(format!(
            "Operation {} is not available for resource {}",
            operation, resource
        ))
    })?;

    check_required(template, fields)?;

    let parts = match operation {
        Operation::SendMessageTemplate => {
            operations::message::build_send_template(client, fields).await?
        }
        _ => (template.build)(fields)?,
    };

    let path = catalog::resolve_path(template, fields)?;
    tracing::debug!(%resource, %operation, %path, "dispatching operation");

    let response = client
        .send(template.verb, &path, &parts.query, parts.body.as_ref())
        .await
        .inspect_err(|err| tracing::debug!(%resource, %operation, %err, "operation failed"))?;

    normalize(template.kind, response)
}

fn check_required(template: &RequestTemplate, fields: &FieldValues) -> Result<()> {
    for name in template.required {
        if fields.str(name).trim().is_empty() {
            return Err(ConnectorError::validation(format!("{} is required", name)));
        }
    }
    Ok(())
}

fn normalize(kind: ResponseKind, response: Value) -> Result<Vec<ResultRecord>> {
    match kind {
        ResponseKind::Single => Ok(vec![ResultRecord { json: response }]),
        ResponseKind::List => {
            let items = response
                .get("items")
                .and_then(Value::as_array)
                .ok_or_else(|| ConnectorError::api("response is missing the items array"))?;
            Ok(items
                .iter()
                .map(|item| ResultRecord { json: item.clone() })
                .collect())
        }
    }
}
