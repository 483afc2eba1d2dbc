//! Per-operation request shaping. Each function turns the current field
//! values into the query string and body for one catalog template.

pub mod contact;
pub mod message;
pub mod panel;
pub mod session;

use crate::error::Result;
use crate::fields::{FieldValues, QueryBuilder};

/// Query string and body for one outbound call.
#[derive(Debug, Default)]
pub struct RequestParts {
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

/// Builder for operations that need nothing beyond path parameters.
pub fn empty(_fields: &FieldValues) -> Result<RequestParts> {
    Ok(RequestParts::default())
}

/// Builder for list endpoints that take only the shared paging parameters.
pub fn paging_only(fields: &FieldValues) -> Result<RequestParts> {
    Ok(RequestParts {
        query: paging(fields).build(),
        body: None,
    })
}

/// Shared paging/ordering parameters for `GET list` endpoints. The host
/// drives the page; the dispatcher never loops.
pub(crate) fn paging(fields: &FieldValues) -> QueryBuilder {
    QueryBuilder::new()
        .push("pageNumber", fields.u32("pageNumber").unwrap_or(1).to_string())
        .push("pageSize", fields.u32("pageSize").unwrap_or(10).to_string())
        .push_if_truthy("orderBy", fields.get("orderBy"))
        .push_if_truthy("orderDirection", fields.get("orderDirection"))
}
