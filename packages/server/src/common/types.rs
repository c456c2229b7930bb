// Common types used across multiple domains and layers
//
// These types are shared between the kernel, domain, and server layers to avoid
// circular dependencies while maintaining type safety.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::common::AppError;

/// Collection names in the document store
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROFESSORS: &str = "profesores";
    pub const CUBICLES: &str = "cubiculos";
    pub const EVENTS: &str = "events";
}

/// Success envelope: `{message, data}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Per-item outcome of a best-effort cascade over dependent documents
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CascadeReport {
    /// Documents that referenced the changed record
    pub matched: usize,
    /// Codes of documents updated successfully
    pub updated: Vec<String>,
    /// Codes of documents whose update failed
    pub failed: Vec<String>,
}

impl CascadeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Current time as an ISO-8601 UTC string, millisecond precision
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "deserialize_some")]`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Accepts a JSON string or number and yields its text form.
///
/// Building, cubicle number and floor are sent as either by clients.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Trimmed, non-empty text or `None`
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Partial-update field: absent stays `None`, present must not be blank
pub fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(text) => non_empty(Some(text))
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{field} cannot be empty"))),
    }
}
