use bacstack_core::{DecodeError, EncodeError, ProtocolError, ValueError};
use bacstack_datalink::DataLinkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("datalink error: {0}")]
    DataLink(#[from] DataLinkError),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("value error: {0}")]
    Value(#[from] ValueError),
    #[error("request timed out")]
    Timeout,
    #[error("inbound message stream closed")]
    StreamClosed,
    /// The sequenced operation panicked or its task was cancelled.
    #[error("sequenced operation aborted")]
    SequenceAborted,
    #[error("unexpected response for service choice {service_choice}")]
    UnexpectedResponse { service_choice: u8 },
}
