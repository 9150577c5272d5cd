use crate::error::{Error, Result};
use serde::Serialize;

/// Envelope printed by `provision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success {
        #[serde(rename = "Message")]
        message: String,
        #[serde(rename = "Branch", skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
    },
    Failure {
        #[serde(rename = "Error")]
        error: String,
    },
}

impl Response {
    pub fn success(message: impl Into<String>, branch: Option<String>) -> Self {
        Self { status_code: 200, body: ResponseBody::Success { message: message.into(), branch } }
    }

    pub fn failure(err: &Error) -> Self {
        Self { status_code: err.status_code(), body: ResponseBody::Failure { error: err.to_string() } }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, ResponseBody::Success { .. })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
