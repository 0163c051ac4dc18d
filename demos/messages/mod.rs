use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A remote call as sent over HTTP. Byte buffers (`data`) travel as base64 strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallRequest {
    pub method: String,
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResultPayload {
    /// base64-encoded image
    Bytes(String),
    Path(PathBuf),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallResponse {
    Success {
        result: ResultPayload,
    },
    Error {
        code: String,
        message: String,
        cause: Option<String>,
    },
    NotImplemented,
}
