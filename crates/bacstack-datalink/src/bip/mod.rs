//! BACnet/IP: BVLC framing and the UDP transport.

pub mod bvlc;
pub mod transport;
