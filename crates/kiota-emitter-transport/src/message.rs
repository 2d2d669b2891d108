//! JSON-RPC 2.0 message types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Protocol version carried by every message
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC error codes
pub mod error_codes {
    /// Reply to an incoming request nobody handles
    pub const METHOD_NOT_FOUND: i64 = -32601;
}

/// Identifier correlating a request with its response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => write!(f, "{s}"),
        }
    }
}

/// Outgoing or incoming request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestMessage {
    /// Create a request with parameters passed by name
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Notification: a request without an id that expects no response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Error object of a failed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseError {
    /// Create an error object without data
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach error data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The human-readable message the remote side placed in `data.message`
    ///
    /// Servers built on StreamJsonRpc put the exception text there; the
    /// top-level `message` is often generic.
    pub fn detail_message(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("message")?
            .as_str()
            .filter(|message| !message.is_empty())
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Response to a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub jsonrpc: String,
    /// `None` only when the remote side could not determine the request id
    pub id: Option<RequestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl ResponseMessage {
    /// Successful response
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Failed response
    pub fn failure(id: Option<RequestId>, error: ResponseError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Split into the result value or the error object
    ///
    /// A response with neither field resolves to `null`.
    pub fn into_result(self) -> Result<Value, ResponseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Any message on the channel
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request(RequestMessage),
    Notification(NotificationMessage),
    Response(ResponseMessage),
}

impl Message {
    /// Classify a decoded JSON value
    ///
    /// `method` with `id` is a request, `method` alone a notification, and
    /// anything else must parse as a response.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let has_method = value.get("method").is_some();
        let has_id = value.get("id").is_some_and(|id| !id.is_null());

        match (has_method, has_id) {
            (true, true) => serde_json::from_value(value).map(Message::Request),
            (true, false) => serde_json::from_value(value).map(Message::Notification),
            (false, _) => serde_json::from_value(value).map(Message::Response),
        }
    }

    /// Decode from a frame body
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_slice(body)?)
    }

    /// Encode as a frame body
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Message::Request(request) => serde_json::to_vec(request),
            Message::Notification(notification) => serde_json::to_vec(notification),
            Message::Response(response) => serde_json::to_vec(response),
        }
    }
}

impl From<RequestMessage> for Message {
    fn from(request: RequestMessage) -> Self {
        Message::Request(request)
    }
}

impl From<ResponseMessage> for Message {
    fn from(response: ResponseMessage) -> Self {
        Message::Response(response)
    }
}

impl From<NotificationMessage> for Message {
    fn from(notification: NotificationMessage) -> Self {
        Message::Notification(notification)
    }
}

#[cfg(test)]
#[path = "message/message_tests.rs"]
mod message_tests;
