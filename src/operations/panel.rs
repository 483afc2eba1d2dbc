use serde_json::Value;

use super::RequestParts;
use crate::error::Result;
use crate::fields::{fold_kv_pairs, BodyBuilder, FieldValues};

pub fn create_card(fields: &FieldValues) -> Result<RequestParts> {
    let custom_fields = fold_kv_pairs(fields.get("customFields"));

    let body = BodyBuilder::new()
        .set("stepId", fields.get("stepId").clone())
        .set("title", fields.get("title").clone())
        .set_if_truthy("description", fields.get("description").clone())
        .set_if_truthy("position", fields.get("position").clone())
        .set_if_truthy("monetaryAmount", fields.get("monetaryAmount").clone())
        .set_if_truthy("contactIds", fields.get("contactIds").clone())
        .set_if_truthy("tagIds", fields.get("tagIds").clone())
        .set_if_truthy("userId", fields.get("userId").clone())
        .set_if_truthy("customFields", Value::Object(custom_fields))
        .build();
    Ok(RequestParts {
        query: Vec::new(),
        body: Some(body),
    })
}

pub fn create_annotation(fields: &FieldValues) -> Result<RequestParts> {
    let body = BodyBuilder::new()
        .set("text", Value::String(fields.str("annotation").to_string()))
        .build();
    Ok(RequestParts {
        query: Vec::new(),
        body: Some(body),
    })
}
