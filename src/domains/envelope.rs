use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound message unit. Field names on the wire follow the backend
/// contract: `requestId`, `type`, `payload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub request_id: String,
    #[serde(rename = "type")]
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Inbound message unit. `error` is present iff `success` is false;
/// `validation` carries raw per-field codes that the catalog translates
/// before the caller sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub request_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<HashMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A successful response after validation translation, before typed decoding.
#[derive(Debug, Clone, Default)]
pub struct ResolvedResponse {
    pub data: Option<Value>,
    pub validation: Option<HashMap<String, String>>,
}

/// What a typed API call yields. `data` is absent when the backend accepted
/// the request but returned only validation feedback.
#[derive(Debug, Clone)]
pub struct CallOutcome<T> {
    pub data: Option<T>,
    pub validation: Option<HashMap<String, String>>,
}

impl<T> CallOutcome<T> {
    /// The field-level validation messages, empty when the backend raised none.
    pub fn validation_messages(&self) -> HashMap<String, String> {
        self.validation.clone().unwrap_or_default()
    }
}
