use serde_json::Value;

use super::{paging, RequestParts};
use crate::error::{ConnectorError, Result};
use crate::fields::{fold_kv_pairs, is_valid_email, BodyBuilder, FieldValues};

pub fn get_all_contacts(fields: &FieldValues) -> Result<RequestParts> {
    Ok(RequestParts {
        query: paging(fields).build(),
        body: None,
    })
}

pub fn create_contact(fields: &FieldValues) -> Result<RequestParts> {
    let email = fields.str("email");
    if !is_valid_email(email) {
        return Err(ConnectorError::validation(format!(
            "Invalid email: {:?}",
            email
        )));
    }

    let custom_fields = fold_kv_pairs(fields.get("customFields"));
    let metadata = fold_kv_pairs(fields.get("metadata"));

    let body = BodyBuilder::new()
        .set("phonenumber", fields.get("phonenumber").clone())
        .set("email", Value::String(email.to_string()))
        .set_if_truthy("name", fields.get("name").clone())
        .set_if_truthy("instagram", fields.get("instagram").clone())
        .set_if_truthy("annotation", fields.get("annotation").clone())
        .set_if_truthy("tagIds", fields.get("tagIds").clone())
        .set_if_truthy("customFields", Value::Object(custom_fields))
        .set_if_truthy("metadata", Value::Object(metadata))
        .set("upsert", Value::Bool(fields.bool("upsert")))
        .set("getIfExists", Value::Bool(fields.bool("getIfExists")))
        .build();

    Ok(RequestParts {
        query: Vec::new(),
        body: Some(body),
    })
}
