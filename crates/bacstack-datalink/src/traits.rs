use crate::DataLinkAddress;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur at the data-link layer.
#[derive(Debug, Error)]
pub enum DataLinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame too large")]
    FrameTooLarge,
    #[error("invalid frame")]
    InvalidFrame,
    #[error("data link closed")]
    Closed,
}

/// Sends and receives complete datagrams.
///
/// Frames are opaque here: BVLC framing is added by the
/// [`builder`](crate::builder) functions and taken apart by
/// [`decode_frame`](crate::builder::decode_frame).
pub trait DataLink: Send + Sync {
    /// Sends `frame` to the given data-link `address`.
    fn send(
        &self,
        address: DataLinkAddress,
        frame: &[u8],
    ) -> impl Future<Output = Result<(), DataLinkError>> + Send;

    /// Receives a datagram into `buf`, returning `(bytes_read, source_address)`.
    fn recv(
        &self,
        buf: &mut [u8],
    ) -> impl Future<Output = Result<(usize, DataLinkAddress), DataLinkError>> + Send;
}
