//! BACnet/IP data link for bacstack.
//!
//! BVLC framing ([`bip::bvlc`]), the UDP transport ([`BacnetIpTransport`]),
//! the [`DataLink`] seam the client drives, and the [`builder`] functions
//! that assemble complete outbound frames.

pub mod address;
pub mod bip;
pub mod builder;
pub mod traits;

pub use address::DataLinkAddress;
pub use bip::bvlc::{BvlcFunction, BvlcHeader, BvlcMessage};
pub use bip::transport::BacnetIpTransport;
pub use builder::decode_frame;
pub use traits::{DataLink, DataLinkError};
