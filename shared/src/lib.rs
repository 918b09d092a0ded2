//! ScopeLink shared protocol types
//!
//! This crate provides the protocol messages and TCP framing codec shared by
//! the microscope acquisition host and its remote-control clients.

pub mod codec;
pub mod proto;

use std::time::{SystemTime, UNIX_EPOCH};

// Re-export the wire types at crate root
pub use proto::*;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Protocol limits shared by host and clients
pub mod limits {
    /// Maximum encoded frame size accepted on a connection
    pub const MAX_FRAME_SIZE: u32 = 1024 * 1024;

    /// Default TCP port of the remote-control interface
    pub const DEFAULT_PORT: u16 = 9360;

    /// Default per-command execution deadline on the host
    pub const COMMAND_DEADLINE_MS: u64 = 30_000;
}

impl Header {
    /// Create a new header with the given endpoint ID and message type
    pub fn new(client_id: impl Into<String>, msg_type: MessageType, sequence_id: u64) -> Self {
        Self {
            client_id: client_id.into(),
            sequence_id,
            timestamp_ms: now_ms(),
            msg_type: msg_type.into(),
        }
    }
}

impl Request {
    /// Create a real-mode request for the given command
    pub fn new(command: request::Command) -> Self {
        Self {
            test_mode: false,
            command: Some(command),
        }
    }

    /// Turn this request into a dry run
    pub fn with_test_mode(mut self) -> Self {
        self.test_mode = true;
        self
    }
}

impl Value {
    /// Create a string field value
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: Some(value::Kind::Text(value.into())),
        }
    }

    /// Create a floating-point field value
    pub fn real(value: f64) -> Self {
        Self {
            kind: Some(value::Kind::Real(value)),
        }
    }

    /// Create an integer field value
    pub fn integer(value: i64) -> Self {
        Self {
            kind: Some(value::Kind::Integer(value)),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            Some(value::Kind::Text(v)) => write!(f, "{}", v),
            Some(value::Kind::Real(v)) => write!(f, "{}", v),
            Some(value::Kind::Integer(v)) => write!(f, "{}", v),
            None => write!(f, "<empty>"),
        }
    }
}

impl Response {
    /// Create a success response for the given request sequence id
    pub fn ok(request_sequence_id: u64) -> Self {
        Self {
            request_sequence_id,
            error: false,
            fields: Default::default(),
        }
    }

    /// Create an error response; error responses carry no fields
    pub fn error(request_sequence_id: u64) -> Self {
        Self {
            request_sequence_id,
            error: true,
            fields: Default::default(),
        }
    }

    /// Add a named field to a success response
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Whether the command failed; check before reading any field
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Read a string field
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name).and_then(|v| v.kind.as_ref()) {
            Some(value::Kind::Text(v)) => Some(v),
            _ => None,
        }
    }

    /// Read a floating-point field
    pub fn real(&self, name: &str) -> Option<f64> {
        match self.fields.get(name).and_then(|v| v.kind.as_ref()) {
            Some(value::Kind::Real(v)) => Some(*v),
            _ => None,
        }
    }

    /// Read an integer field
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.fields.get(name).and_then(|v| v.kind.as_ref()) {
            Some(value::Kind::Integer(v)) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_creation() {
        let header = Header::new("dave-01", MessageType::MsgRequest, 7);
        assert_eq!(header.client_id, "dave-01");
        assert_eq!(header.sequence_id, 7);
        assert!(header.timestamp_ms > 0);
    }

    #[test]
    fn test_ok_response_fields() {
        let response = Response::ok(3)
            .with_field("stage_x", Value::real(10.0))
            .with_field("objective", Value::text("100x"));

        assert!(!response.has_error());
        assert_eq!(response.real("stage_x"), Some(10.0));
        assert_eq!(response.text("objective"), Some("100x"));
        assert_eq!(response.request_sequence_id, 3);
    }

    #[test]
    fn test_error_response_has_no_fields() {
        let response = Response::error(4);
        assert!(response.has_error());
        assert!(response.fields.is_empty());
        assert_eq!(response.real("duration"), None);
    }

    #[test]
    fn test_field_type_mismatch_reads_none() {
        let response = Response::ok(1).with_field("duration", Value::integer(1));
        assert_eq!(response.real("duration"), None);
        assert_eq!(response.integer("duration"), Some(1));
    }

    #[test]
    fn test_request_test_mode() {
        let request = Request::new(request::Command::GetObjective(GetObjective {}));
        assert!(!request.test_mode);
        assert!(request.with_test_mode().test_mode);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::text("100x").to_string(), "100x");
        assert_eq!(Value::real(6.25).to_string(), "6.25");
        assert_eq!(Value::integer(1).to_string(), "1");
    }
}
