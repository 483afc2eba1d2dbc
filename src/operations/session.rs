use serde_json::Value;

use super::{paging, RequestParts};
use crate::error::{ConnectorError, Result};
use crate::fields::{BodyBuilder, FieldValues};

pub fn get_all_sessions(fields: &FieldValues) -> Result<RequestParts> {
    let query = paging(fields)
        // Array filters go out as repeated parameters; the API rejects
        // comma-joined values.
        .push_repeated("Status", fields.get("statusSession"))
        .push_repeated("ChannelsId", fields.get("channelsIds"))
        .push_repeated("IncludeDetails", fields.get("includeDetails"))
        .push_repeated("TagsId", fields.get("tagIds"))
        .push_if_truthy("departmentId", fields.get("departmentId"))
        .push_if_truthy("userId", fields.get("userId"))
        .push_if_truthy("contactId", fields.get("contactId"))
        .push_datetime("CreatedAt.After", fields.get("createdAtAfter"))
        .push_datetime("CreatedAt.Before", fields.get("createdAtBefore"))
        .push_datetime("UpdatedAt.After", fields.get("updatedAtAfter"))
        .push_datetime("UpdatedAt.Before", fields.get("updatedAtBefore"))
        .push_datetime("ActiveAt.After", fields.get("activeAtAfter"))
        .push_datetime("ActiveAt.Before", fields.get("activeAtBefore"))
        .push_datetime("EndAt.After", fields.get("endAtAfter"))
        .push_datetime("EndAt.Before", fields.get("endAtBefore"))
        .build();
    Ok(RequestParts { query, body: None })
}

pub fn update_transfer(fields: &FieldValues) -> Result<RequestParts> {
    let department = fields.str("newDepartmentId");
    let user = fields.str("newUserId");
    if department.is_empty() && user.is_empty() {
        return Err(ConnectorError::validation(
            "Choose a department or user to transfer the session to",
        ));
    }

    // The API routes the transfer on `type`; a user target wins when both
    // are set.
    let transfer_type = if user.is_empty() { "DEPARTMENT" } else { "USER" };

    let body = BodyBuilder::new()
        .set("type", Value::String(transfer_type.to_string()))
        .set_if_truthy("newDepartmentId", fields.get("newDepartmentId").clone())
        .set_if_truthy("newUserId", fields.get("newUserId").clone())
        .build();
    Ok(RequestParts {
        query: Vec::new(),
        body: Some(body),
    })
}

pub fn update_status(fields: &FieldValues) -> Result<RequestParts> {
    let body = BodyBuilder::new()
        .set("newStatus", Value::String(fields.str("newStatus").to_string()))
        .build();
    Ok(RequestParts {
        query: Vec::new(),
        body: Some(body),
    })
}
