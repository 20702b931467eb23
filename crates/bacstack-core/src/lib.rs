//! BACnet wire-format encoding and decoding in pure Rust.
//!
//! `bacstack-core` owns everything below the data link: the one-byte tag
//! codec, the application primitive values, the NPDU network header, the four
//! implemented APDU kinds and the service payloads they carry. Decoding borrows
//! its input and produces owned, immutable message trees.
//!
//! # Feature flags
//!
//! - **`serde`**: derives `Serialize`/`Deserialize` on value and identifier types.

/// APDU (Application Protocol Data Unit) kinds and their service dispatch.
pub mod apdu;
/// Cursor, writer, tag system and low-level integer helpers.
pub mod encoding;
/// Error types for encoding, decoding and value construction.
pub mod error;
/// NPDU (Network Protocol Data Unit) header and network-layer message.
pub mod npdu;
/// BACnet service request and response payload codecs.
pub mod services;
/// Identifier types: object identifiers, object types and property identifiers.
pub mod types;
/// Application primitive values and the tag-number dispatcher.
pub mod value;

pub use error::{DecodeError, EncodeError, Layer, ProtocolError, ValueError};
