use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\-.]+@([\w\-]+\.)+[\w\-]{2,4}$").unwrap());

static NULL: Value = Value::Null;

/// Read-only snapshot of the field values the host has collected for the
/// current invocation, keyed by field name. Absent fields read as `Null`.
#[derive(Debug, Clone, Default)]
pub struct FieldValues(Map<String, Value>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from a JSON object. Anything that is not an object
    /// yields an empty set.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => FieldValues(map),
            _ => FieldValues::default(),
        }
    }

    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> &Value {
        self.0.get(name).unwrap_or(&NULL)
    }

    pub fn str(&self, name: &str) -> &str {
        self.get(name).as_str().unwrap_or("")
    }

    pub fn bool(&self, name: &str) -> bool {
        self.get(name).as_bool().unwrap_or(false)
    }

    pub fn u32(&self, name: &str) -> Option<u32> {
        self.get(name).as_u64().and_then(|n| u32::try_from(n).ok())
    }

    pub fn str_array(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Presence rule for optional fields: the remote API treats presence as
/// intent-to-set, so falsy values are omitted from payloads entirely.
/// Note that this drops a legitimately-zero number as well; see DESIGN.md.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw)
}

/// Folds a list of `{key, value}` pairs into a flat object. Duplicate keys
/// resolve last-write-wins.
pub fn fold_kv_pairs(list: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    if let Some(items) = list.as_array() {
        for item in items {
            if let Some(key) = item.get("key").and_then(Value::as_str) {
                let value = item.get("value").cloned().unwrap_or(Value::Null);
                out.insert(key.to_string(), value);
            }
        }
    }
    out
}

/// Normalizes the host's date-time inputs (`YYYY-MM-DD hh:mm` or RFC 3339)
/// before they hit the query string. Unrecognized values pass through so the
/// API can reject them with its own message.
pub fn normalize_datetime(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_rfc3339());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.format("%Y-%m-%dT%H:%M:%S").to_string());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(format!("{}T00:00:00", date.format("%Y-%m-%d")));
    }
    Some(raw.to_string())
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accumulates a JSON body, appending optional entries only when present.
#[derive(Debug, Default)]
pub struct BodyBuilder(Map<String, Value>);

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always includes the entry.
    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    /// Includes the entry only when the value is truthy.
    pub fn set_if_truthy(mut self, key: &str, value: Value) -> Self {
        if is_truthy(&value) {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.0)
    }
}

/// Accumulates query parameters. Array-valued filters become repeated
/// parameters, never comma-joined.
#[derive(Debug, Default)]
pub struct QueryBuilder(Vec<(String, String)>);

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.push((key.to_string(), value.into()));
        self
    }

    pub fn push_if_truthy(mut self, key: &str, value: &Value) -> Self {
        if is_truthy(value) {
            self.0.push((key.to_string(), scalar_to_string(value)));
        }
        self
    }

    pub fn push_repeated(mut self, key: &str, value: &Value) -> Self {
        if let Some(items) = value.as_array() {
            for item in items {
                self.0.push((key.to_string(), scalar_to_string(item)));
            }
        }
        self
    }

    pub fn push_datetime(mut self, key: &str, value: &Value) -> Self {
        if let Some(normalized) = value.as_str().and_then(normalize_datetime) {
            self.0.push((key.to_string(), normalized));
        }
        self
    }

    pub fn build(self) -> Vec<(String, String)> {
        self.0
    }
}
