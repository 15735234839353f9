//! Response types for the API

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::device::Device;

/// Value of `status` that marks an application-level failure
pub const ERROR_STATUS: &str = "Error";

/// Body of `GET devices`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

/// Status envelope any response body may carry
///
/// A `200 OK` whose body has `"status": "Error"` is still a failure; the
/// reason is in `statustext`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub statustext: Option<String>,
}

impl ApiStatus {
    /// Extract the envelope from an arbitrary body
    ///
    /// Bodies that are not objects, or whose `status` is not a string, carry
    /// no status.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string);
        // non-string reasons are kept in their JSON form
        let statustext = body.get("statustext").and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        Self { status, statustext }
    }

    /// Whether the body reports an application error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some(ERROR_STATUS)
    }

    /// The error message when the body reports an application error
    ///
    /// A missing `statustext` yields an empty message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.is_error()
            .then(|| self.statustext.as_deref().unwrap_or_default())
    }
}
