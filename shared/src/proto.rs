//! Wire messages for the remote-control protocol
//!
//! Hand-derived prost messages; tag numbers are part of the wire contract
//! and must not be reused.

use std::collections::HashMap;

use prost::{Enumeration, Message};

/// Direction of an envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum MessageType {
    MsgUnknown = 0,
    MsgRequest = 1,
    MsgResponse = 2,
}

#[derive(Clone, PartialEq, Message)]
pub struct Header {
    /// Identifier of the sending endpoint
    #[prost(string, tag = "1")]
    pub client_id: String,

    /// Per-endpoint monotonic sequence number
    #[prost(uint64, tag = "2")]
    pub sequence_id: u64,

    #[prost(uint64, tag = "3")]
    pub timestamp_ms: u64,

    #[prost(enumeration = "MessageType", tag = "4")]
    pub msg_type: i32,
}

/// Top-level frame payload: one request or one response
#[derive(Clone, PartialEq, Message)]
pub struct Envelope {
    #[prost(message, optional, tag = "1")]
    pub header: Option<Header>,

    #[prost(oneof = "envelope::Payload", tags = "2, 3")]
    pub payload: Option<envelope::Payload>,
}

pub mod envelope {
    use prost::Oneof;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Payload {
        #[prost(message, tag = "2")]
        Request(super::Request),
        #[prost(message, tag = "3")]
        Response(super::Response),
    }
}

/// Query mosaic calibration for every configured objective
#[derive(Clone, PartialEq, Message)]
pub struct GetMosaicSettings {}

/// Query the currently selected objective
#[derive(Clone, PartialEq, Message)]
pub struct GetObjective {}

/// Query the current stage position
#[derive(Clone, PartialEq, Message)]
pub struct GetStagePosition {}

/// Relocate the stage
#[derive(Clone, PartialEq, Message)]
pub struct MoveStage {
    #[prost(double, tag = "1")]
    pub x: f64,

    #[prost(double, tag = "2")]
    pub y: f64,
}

/// Switch the active parameter set by name or zero-based index
#[derive(Clone, PartialEq, Message)]
pub struct SetParameters {
    #[prost(oneof = "set_parameters::Target", tags = "1, 2")]
    pub target: Option<set_parameters::Target>,
}

pub mod set_parameters {
    use prost::Oneof;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Target {
        #[prost(string, tag = "1")]
        Name(String),
        #[prost(uint32, tag = "2")]
        Index(u32),
    }
}

/// Acquire a movie of `length` frames
#[derive(Clone, PartialEq, Message)]
pub struct TakeMovie {
    #[prost(string, tag = "1")]
    pub directory: String,

    /// Base filename without extension
    #[prost(string, tag = "2")]
    pub name: String,

    #[prost(uint32, tag = "3")]
    pub length: u32,

    /// Parameter set to acquire under; "default" or absent means the active set
    #[prost(string, optional, tag = "4")]
    pub parameters: Option<String>,

    /// Permit replacing an existing artifact of the same name
    #[prost(bool, tag = "5")]
    pub overwrite: bool,
}

/// One remote-control command
///
/// `test_mode` requests a dry run: the command is validated and derived
/// values are computed, but no hardware action or file write happens.
#[derive(Clone, PartialEq, Message)]
pub struct Request {
    #[prost(bool, tag = "1")]
    pub test_mode: bool,

    #[prost(oneof = "request::Command", tags = "2, 3, 4, 5, 6, 7")]
    pub command: Option<request::Command>,
}

pub mod request {
    use prost::Oneof;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Command {
        #[prost(message, tag = "2")]
        GetMosaicSettings(super::GetMosaicSettings),
        #[prost(message, tag = "3")]
        GetObjective(super::GetObjective),
        #[prost(message, tag = "4")]
        GetStagePosition(super::GetStagePosition),
        #[prost(message, tag = "5")]
        MoveStage(super::MoveStage),
        #[prost(message, tag = "6")]
        SetParameters(super::SetParameters),
        #[prost(message, tag = "7")]
        TakeMovie(super::TakeMovie),
    }
}

/// A single named response field value
#[derive(Clone, PartialEq, Message)]
pub struct Value {
    #[prost(oneof = "value::Kind", tags = "1, 2, 3")]
    pub kind: Option<value::Kind>,
}

pub mod value {
    use prost::Oneof;

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Kind {
        #[prost(string, tag = "1")]
        Text(String),
        #[prost(double, tag = "2")]
        Real(f64),
        #[prost(int64, tag = "3")]
        Integer(i64),
    }
}

/// Result of one command
///
/// Carries either named fields (success) or the error flag, never both.
/// The wire does not classify errors further; the host logs the kind.
#[derive(Clone, PartialEq, Message)]
pub struct Response {
    /// Sequence id of the request this response answers
    #[prost(uint64, tag = "1")]
    pub request_sequence_id: u64,

    #[prost(bool, tag = "2")]
    pub error: bool,

    #[prost(map = "string, message", tag = "3")]
    pub fields: HashMap<String, Value>,
}
