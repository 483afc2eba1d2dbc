//! Resolvers backed by the `/core/v1` endpoints: departments, agents, tags
//! and contact custom fields.

use async_trait::async_trait;
use serde_json::Value;

use super::{as_plain_array, map_options, OptionPair, OptionResolver};
use crate::client::ApiClient;
use crate::error::{ConnectorError, Result};
use crate::fields::FieldValues;

pub struct Departments;

#[async_trait]
impl OptionResolver for Departments {
    fn name(&self) -> &'static str {
        "getDepartmentsIds"
    }

    async fn resolve(&self, client: &ApiClient, _fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = client
            .get("/core/v1/department", &[])
            .await
            .map_err(|e| ConnectorError::resolver("departments", e))?;
        Ok(map_options(as_plain_array(&data, "departments")?, "name", "id"))
    }
}

pub struct Users;

#[async_trait]
impl OptionResolver for Users {
    fn name(&self) -> &'static str {
        "getUsersIds"
    }

    async fn resolve(&self, client: &ApiClient, _fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = client
            .get("/core/v1/agent", &[])
            .await
            .map_err(|e| ConnectorError::resolver("users", e))?;
        Ok(map_options(as_plain_array(&data, "users")?, "name", "userId"))
    }
}

/// The agent endpoint has no server-side department filter, so the full
/// list is fetched and joined locally against each agent's department
/// memberships.
pub struct UsersByDepartment;

#[async_trait]
impl OptionResolver for UsersByDepartment {
    fn name(&self) -> &'static str {
        "getUsersByDepartments"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &["departmentId"]
    }

    async fn resolve(&self, client: &ApiClient, fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let department_id = fields.str("departmentId");
        let data = client
            .get("/core/v1/agent", &[])
            .await
            .map_err(|e| ConnectorError::resolver("users", e))?;

        let matching: Vec<Value> = as_plain_array(&data, "users")?
            .iter()
            .filter(|user| {
                user.get("departments")
                    .and_then(Value::as_array)
                    .map(|memberships| {
                        memberships.iter().any(|m| {
                            m.get("departmentId").and_then(Value::as_str) == Some(department_id)
                        })
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        Ok(map_options(&matching, "name", "userId"))
    }
}

pub struct Tags;

#[async_trait]
impl OptionResolver for Tags {
    fn name(&self) -> &'static str {
        "getTagsIds"
    }

    async fn resolve(&self, client: &ApiClient, _fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = client
            .get("/core/v1/tag", &[])
            .await
            .map_err(|e| ConnectorError::resolver("tags", e))?;
        Ok(map_options(as_plain_array(&data, "tags")?, "name", "id"))
    }
}

/// Contact custom fields: the stored value is the field key, not an id.
pub struct CustomFields;

#[async_trait]
impl OptionResolver for CustomFields {
    fn name(&self) -> &'static str {
        "getCustomFields"
    }

    async fn resolve(&self, client: &ApiClient, _fields: &FieldValues) -> Result<Vec<OptionPair>> {
        let data = client
            .get("/core/v1/contact/custom-field", &[])
            .await
            .map_err(|e| ConnectorError::resolver("custom fields", e))?;
        Ok(map_options(as_plain_array(&data, "custom fields")?, "name", "key"))
    }
}
