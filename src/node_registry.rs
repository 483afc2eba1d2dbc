//! Declarative catalog of every UI field the connector exposes. This is
//! pure data: the workflow host renders it, and the `describe` command dumps
//! it as JSON. Visibility is scoped per operation; selector fields carry the
//! name of the resolver that populates them and, where applicable, the field
//! they depend on.

use serde::Serialize;
use serde_json::json;

use crate::catalog::{self, Operation, Resource};
use crate::resolvers::ResolverRegistry;

use Operation::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    DateTime,
    Options,
    MultiOptions,
    Collection,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StaticOption {
    pub name: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [StaticOption],
    /// Resolver populating this selector, when dynamic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_options: Option<&'static str>,
    /// Field whose current value scopes the resolver's query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<&'static str>,
    /// Operations this field is visible for.
    pub operations: &'static [Operation],
}

const fn field(
    name: &'static str,
    label: &'static str,
    field_type: FieldType,
    operations: &'static [Operation],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        field_type,
        required: false,
        default: None,
        options: &[],
        load_options: None,
        depends_on: None,
        operations,
    }
}

const fn required(spec: FieldSpec) -> FieldSpec {
    FieldSpec { required: true, ..spec }
}

const fn with_default(spec: FieldSpec, default: &'static str) -> FieldSpec {
    FieldSpec { default: Some(default), ..spec }
}

const fn loaded_by(spec: FieldSpec, resolver: &'static str) -> FieldSpec {
    FieldSpec { load_options: Some(resolver), ..spec }
}

const fn depending_on(spec: FieldSpec, dependency: &'static str) -> FieldSpec {
    FieldSpec { depends_on: Some(dependency), ..spec }
}

const fn with_options(spec: FieldSpec, options: &'static [StaticOption]) -> FieldSpec {
    FieldSpec { options, ..spec }
}

const ORDER_DIRECTIONS: &[StaticOption] = &[
    StaticOption { name: "Ascending", value: "ASCENDING" },
    StaticOption { name: "Descending", value: "DESCENDING" },
];

const SESSION_STATUSES: &[StaticOption] = &[
    StaticOption { name: "Undefined", value: "UNDEFINED" },
    StaticOption { name: "Started", value: "STARTED" },
    StaticOption { name: "Pending", value: "PENDING" },
    StaticOption { name: "In Progress", value: "IN_PROGRESS" },
    StaticOption { name: "Completed", value: "COMPLETED" },
    StaticOption { name: "Hidden", value: "HIDDEN" },
];

const INCLUDE_DETAILS: &[StaticOption] = &[
    StaticOption { name: "Undefined", value: "Undefined" },
    StaticOption { name: "AgentDetails", value: "AgentDetails" },
    StaticOption { name: "DepartmentsDetails", value: "DepartmentsDetails" },
    StaticOption { name: "ContactDetails", value: "ContactDetails" },
    StaticOption { name: "ChannelTypeDetails", value: "ChannelTypeDetails" },
    StaticOption { name: "ClassificationDetails", value: "ClassificationDetails" },
    StaticOption { name: "ChannelDetails", value: "ChannelDetails" },
];

const LIST_OPS: &[Operation] = &[GetAllContacts, GetAllMessages, GetAllSessions, GetAllAnnotation];
const SEND_OPS: &[Operation] = &[SendMessageText, SendMessageTemplate];

pub fn node_properties() -> &'static [FieldSpec] {
    static PROPERTIES: &[FieldSpec] = &[
        // Shared paging controls for every list operation.
        with_default(field("pageNumber", "Page Number", FieldType::Number, LIST_OPS), "1"),
        with_default(field("pageSize", "Page Size", FieldType::Number, LIST_OPS), "10"),
        field("orderBy", "Order By", FieldType::String, LIST_OPS),
        with_options(
            field("orderDirection", "Order Direction", FieldType::Options, LIST_OPS),
            ORDER_DIRECTIONS,
        ),
        // Contact.
        required(field("contactId", "Contact Id", FieldType::String, &[GetContactById])),
        required(field(
            "phonenumber",
            "Phone Number",
            FieldType::String,
            &[GetContactByPhone, CreateContact],
        )),
        field("name", "Name", FieldType::String, &[CreateContact]),
        required(field("email", "E-mail", FieldType::String, &[CreateContact])),
        field("instagram", "Instagram", FieldType::String, &[CreateContact]),
        field("annotation", "Annotation", FieldType::String, &[CreateContact, CreateAnnotation]),
        loaded_by(
            field(
                "tagIds",
                "Tags",
                FieldType::MultiOptions,
                &[CreateContact, GetAllSessions, CreateCard],
            ),
            "getTagsIds",
        ),
        loaded_by(
            field(
                "customFields",
                "Custom Fields",
                FieldType::Collection,
                &[CreateContact, CreateCard],
            ),
            "getCustomFields",
        ),
        field("metadata", "Metadata", FieldType::Collection, &[CreateContact]),
        with_default(field("upsert", "Upsert", FieldType::Boolean, &[CreateContact]), "false"),
        with_default(
            field("getIfExists", "Get If Exists?", FieldType::Boolean, &[CreateContact]),
            "false",
        ),
        // Message.
        required(field(
            "messageId",
            "Message Id",
            FieldType::String,
            &[GetMessageById, GetMessageStatus],
        )),
        field(
            "sessionId",
            "Session Id",
            FieldType::String,
            &[GetAllMessages, SendMessageText, SendMessageTemplate, UpdateTransfer, UpdateStatusSession],
        ),
        field(
            "createdAtAfter",
            "CreatedAt.After",
            FieldType::DateTime,
            &[GetAllMessages, GetAllSessions],
        ),
        field(
            "createdAtBefore",
            "CreatedAt.Before",
            FieldType::DateTime,
            &[GetAllMessages, GetAllSessions],
        ),
        field(
            "updatedAtAfter",
            "UpdatedAt.After",
            FieldType::DateTime,
            &[GetAllMessages, GetAllSessions],
        ),
        field(
            "updatedAtBefore",
            "UpdatedAt.Before",
            FieldType::DateTime,
            &[GetAllMessages, GetAllSessions],
        ),
        field("activeAtAfter", "ActiveAt.After", FieldType::DateTime, &[GetAllSessions]),
        field("activeAtBefore", "ActiveAt.Before", FieldType::DateTime, &[GetAllSessions]),
        field("endAtAfter", "EndAt.After", FieldType::DateTime, &[GetAllSessions]),
        field("endAtBefore", "EndAt.Before", FieldType::DateTime, &[GetAllSessions]),
        loaded_by(required(field("channelId", "From", FieldType::Options, SEND_OPS)), "getChannelsIds"),
        required(field("numberToSend", "To", FieldType::String, SEND_OPS)),
        field("textMessage", "Text", FieldType::String, &[SendMessageText]),
        depending_on(
            loaded_by(
                required(field("templateName", "Template", FieldType::Options, &[SendMessageTemplate])),
                "getTemplates",
            ),
            "channelId",
        ),
        depending_on(
            loaded_by(
                field("templateParams", "Template Parameters", FieldType::Collection, &[SendMessageTemplate]),
                "getTemplatesParams",
            ),
            "templateName",
        ),
        loaded_by(field("botId", "Bots", FieldType::Options, SEND_OPS), "getBots"),
        loaded_by(
            field(
                "departmentId",
                "Departments",
                FieldType::Options,
                &[SendMessageText, SendMessageTemplate, GetAllSessions],
            ),
            "getDepartmentsIds",
        ),
        depending_on(
            loaded_by(
                field("userIdByDepartment", "User", FieldType::Options, SEND_OPS),
                "getUsersByDepartments",
            ),
            "departmentId",
        ),
        with_default(field("enableBot", "Enable Bot", FieldType::Boolean, SEND_OPS), "false"),
        with_default(field("hiddenSession", "Hidden Session", FieldType::Boolean, SEND_OPS), "false"),
        with_default(
            field("forceStartSession", "Force Start Session", FieldType::Boolean, SEND_OPS),
            "false",
        ),
        // Session.
        loaded_by(
            field("channelsIds", "Channels", FieldType::MultiOptions, &[GetAllSessions]),
            "getChannelsIds",
        ),
        loaded_by(
            field("userId", "User Id", FieldType::Options, &[GetAllSessions, CreateCard]),
            "getUsersIds",
        ),
        field("contactId", "Contact Id", FieldType::String, &[GetAllSessions]),
        with_options(
            field("statusSession", "Status Session", FieldType::MultiOptions, &[GetAllSessions]),
            SESSION_STATUSES,
        ),
        with_options(
            field("includeDetails", "Include Details", FieldType::MultiOptions, &[GetAllSessions]),
            INCLUDE_DETAILS,
        ),
        with_options(
            required(field("newStatus", "New Status", FieldType::Options, &[UpdateStatusSession])),
            SESSION_STATUSES,
        ),
        loaded_by(
            field("newDepartmentId", "New Department", FieldType::Options, &[UpdateTransfer]),
            "getDepartmentsIds",
        ),
        loaded_by(
            field("newUserId", "New User", FieldType::Options, &[UpdateTransfer]),
            "getUsersIds",
        ),
        // Panel.
        loaded_by(field("panelId", "Panel", FieldType::Options, &[CreateCard]), "getPanels"),
        depending_on(
            loaded_by(required(field("stepId", "Step", FieldType::Options, &[CreateCard])), "getStepsPanelId"),
            "panelId",
        ),
        required(field("cardId", "Card Id", FieldType::String, &[GetAllAnnotation, CreateAnnotation])),
        required(field("title", "Title", FieldType::String, &[CreateCard])),
        field("description", "Description", FieldType::String, &[CreateCard]),
        field("position", "Position", FieldType::Number, &[CreateCard]),
        field("monetaryAmount", "Monetary Amount", FieldType::Number, &[CreateCard]),
        field("contactIds", "Contact Ids", FieldType::MultiOptions, &[CreateCard]),
    ];
    PROPERTIES
}

/// Full machine-readable description of the connector: resources, the
/// operation catalog and every field definition.
pub fn describe() -> serde_json::Value {
    let operations: Vec<_> = catalog::catalog()
        .iter()
        .map(|t| {
            json!({
                "resource": t.resource,
                "operation": t.operation,
                "verb": t.verb,
                "path": t.path,
                "required": t.required,
                "kind": t.kind,
                "paged": t.paged,
            })
        })
        .collect();

    json!({
        "name": "WTS Chat",
        "resources": [Resource::Contact, Resource::Message, Resource::Session, Resource::Panel],
        "operations": operations,
        "properties": node_properties(),
        "resolvers": ResolverRegistry::new().names(),
    })
}
