use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, Result};
use crate::fields::FieldValues;
use crate::operations::{self, RequestParts};

/// Top-level entity category exposed by the operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Contact,
    Message,
    Session,
    Panel,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Contact => "contact",
            Resource::Message => "message",
            Resource::Session => "session",
            Resource::Panel => "panel",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "contact" => Some(Resource::Contact),
            "message" => Some(Resource::Message),
            "session" => Some(Resource::Session),
            "panel" => Some(Resource::Panel),
            _ => None,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specific action within a resource. Identifiers match what the host
/// stores in the workflow definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GetAllContacts,
    GetContactById,
    GetContactByPhone,
    CreateContact,
    GetMessageById,
    GetMessageStatus,
    GetAllMessages,
    SendMessageText,
    SendMessageTemplate,
    GetAllSessions,
    UpdateTransfer,
    UpdateStatusSession,
    CreateCard,
    GetAllAnnotation,
    CreateAnnotation,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAllContacts => "getAllContacts",
            Operation::GetContactById => "getContactById",
            Operation::GetContactByPhone => "getContactByPhone",
            Operation::CreateContact => "createContact",
            Operation::GetMessageById => "getMessageById",
            Operation::GetMessageStatus => "getMessageStatus",
            Operation::GetAllMessages => "getAllMessages",
            Operation::SendMessageText => "sendMessageText",
            Operation::SendMessageTemplate => "sendMessageTemplate",
            Operation::GetAllSessions => "getAllSessions",
            Operation::UpdateTransfer => "updateTransfer",
            Operation::UpdateStatusSession => "updateStatusSession",
            Operation::CreateCard => "createCard",
            Operation::GetAllAnnotation => "getAllAnnotation",
            Operation::CreateAnnotation => "createAnnotation",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        ALL_OPERATIONS.iter().copied().find(|op| op.as_str() == raw)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ALL_OPERATIONS: &[Operation] = &[
    Operation::GetAllContacts,
    Operation::GetContactById,
    Operation::GetContactByPhone,
    Operation::CreateContact,
    Operation::GetMessageById,
    Operation::GetMessageStatus,
    Operation::GetAllMessages,
    Operation::SendMessageText,
    Operation::SendMessageTemplate,
    Operation::GetAllSessions,
    Operation::UpdateTransfer,
    Operation::UpdateStatusSession,
    Operation::CreateCard,
    Operation::GetAllAnnotation,
    Operation::CreateAnnotation,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
}

/// Shape of a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// `{items: [...], hasMorePages}`; each element becomes one record.
    List,
    /// A single object; yields exactly one record.
    Single,
}

/// Static mapping from one `(resource, operation)` pair to the outbound
/// request. `path` carries `{field}` placeholders substituted from the
/// field values; `required` fields fail validation when blank.
pub struct RequestTemplate {
    pub resource: Resource,
    pub operation: Operation,
    pub verb: Verb,
    pub path: &'static str,
    pub required: &'static [&'static str],
    pub kind: ResponseKind,
    /// Whether the endpoint takes `pageNumber`/`pageSize`/order parameters.
    pub paged: bool,
    pub build: fn(&FieldValues) -> Result<RequestParts>,
}

pub fn catalog() -> &'static [RequestTemplate] {
    static CATALOG: &[RequestTemplate] = &[
        RequestTemplate {
            resource: Resource::Contact,
            operation: Operation::GetAllContacts,
            verb: Verb::Get,
            path: "/core/v1/contact",
            required: &[],
            kind: ResponseKind::List,
            paged: true,
            build: operations::contact::get_all_contacts,
        },
        RequestTemplate {
            resource: Resource::Contact,
            operation: Operation::GetContactById,
            verb: Verb::Get,
            path: "/core/v1/contact/{contactId}",
            required: &["contactId"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::empty,
        },
        RequestTemplate {
            resource: Resource::Contact,
            operation: Operation::GetContactByPhone,
            verb: Verb::Get,
            path: "/core/v1/contact/phonenumber/{phonenumber}",
            required: &["phonenumber"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::empty,
        },
        RequestTemplate {
            resource: Resource::Contact,
            operation: Operation::CreateContact,
            verb: Verb::Post,
            path: "/core/v1/contact",
            required: &["phonenumber"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::contact::create_contact,
        },
        RequestTemplate {
            resource: Resource::Message,
            operation: Operation::GetMessageById,
            verb: Verb::Get,
            path: "/chat/v1/message/{messageId}",
            required: &["messageId"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::empty,
        },
        RequestTemplate {
            resource: Resource::Message,
            operation: Operation::GetMessageStatus,
            verb: Verb::Get,
            path: "/chat/v1/message/{messageId}/status",
            required: &["messageId"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::empty,
        },
        RequestTemplate {
            resource: Resource::Message,
            operation: Operation::GetAllMessages,
            verb: Verb::Get,
            path: "/chat/v1/message",
            required: &["sessionId"],
            kind: ResponseKind::List,
            paged: true,
            build: operations::message::get_all_messages,
        },
        RequestTemplate {
            resource: Resource::Message,
            operation: Operation::SendMessageText,
            verb: Verb::Post,
            path: "/chat/v1/message/send",
            required: &["channelId", "numberToSend"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::message::send_message_text,
        },
        // The template send resolves the template through an extra lookup
        // call; the dispatcher routes it through an async builder instead.
        RequestTemplate {
            resource: Resource::Message,
            operation: Operation::SendMessageTemplate,
            verb: Verb::Post,
            path: "/chat/v1/message/send",
            required: &["channelId", "numberToSend", "templateName"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::empty,
        },
        RequestTemplate {
            resource: Resource::Session,
            operation: Operation::GetAllSessions,
            verb: Verb::Get,
            path: "/chat/v1/session",
            required: &[],
            kind: ResponseKind::List,
            paged: true,
            build: operations::session::get_all_sessions,
        },
        RequestTemplate {
            resource: Resource::Session,
            operation: Operation::UpdateTransfer,
            verb: Verb::Put,
            path: "/chat/v1/session/{sessionId}/transfer",
            required: &["sessionId"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::session::update_transfer,
        },
        RequestTemplate {
            resource: Resource::Session,
            operation: Operation::UpdateStatusSession,
            verb: Verb::Put,
            path: "/chat/v1/session/{sessionId}/status",
            required: &["sessionId", "newStatus"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::session::update_status,
        },
        RequestTemplate {
            resource: Resource::Panel,
            operation: Operation::CreateCard,
            verb: Verb::Post,
            path: "/crm/v1/panel/card",
            required: &["stepId", "title"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::panel::create_card,
        },
        RequestTemplate {
            resource: Resource::Panel,
            operation: Operation::GetAllAnnotation,
            verb: Verb::Get,
            path: "/crm/v1/panel/card/{cardId}/note",
            required: &["cardId"],
            kind: ResponseKind::List,
            paged: true,
            build: operations::paging_only,
        },
        RequestTemplate {
            resource: Resource::Panel,
            operation: Operation::CreateAnnotation,
            verb: Verb::Post,
            path: "/crm/v1/panel/card/{cardId}/note",
            required: &["cardId", "annotation"],
            kind: ResponseKind::Single,
            paged: false,
            build: operations::panel::create_annotation,
        },
    ];
    CATALOG
}

pub fn lookup(resource: Resource, operation: Operation) -> Option<&'static RequestTemplate> {
    catalog()
        .iter()
        .find(|t| t.resource == resource && t.operation == operation)
}

/// Substitutes `{field}` placeholders in a path template. Blank values fail
/// validation rather than producing a broken URL; substituted values are
/// percent-encoded so reserved characters cannot alter the path shape.
pub fn resolve_path(template: &RequestTemplate, fields: &FieldValues) -> Result<String> {
    let mut path = String::from(template.path);
    while let Some(start) = path.find('{') {
        let end = path[start..]
            .find('}')
            .map(|i| start + i)
            .ok_or_else(|| {
                ConnectorError::validation(format!("Malformed path template: {}", template.path))
            })?;
        let name = path[start + 1..end].to_string();
        let value = fields.str(&name);
        if value.trim().is_empty() {
            return Err(ConnectorError::validation(format!("{} is required", name)));
        }
        path.replace_range(start..=end, &urlencoding::encode(value.trim()));
    }
    Ok(path)
}
