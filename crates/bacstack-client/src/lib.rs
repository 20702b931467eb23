//! Async BACnet/IP stack on top of `bacstack-core` and `bacstack-datalink`.
//!
//! - [`Sequence`]: per-destination send queue with a thread limit and an
//!   inter-send delay.
//! - [`flow`]: predicates and [`Flow`] for picking responses out of the
//!   inbound stream.
//! - [`receiver`]: the receive loop that decodes datagrams into
//!   [`InboundMessage`]s.
//! - [`Responder`]: answers Who-Is, ReadProperty and WriteProperty from a
//!   [`PropertyStore`].
//! - [`BacnetStack`]: ties the above to a [`DataLink`](bacstack_datalink::DataLink).

pub mod config;
pub mod error;
pub mod flow;
pub mod receiver;
pub mod responder;
pub mod sequence;
pub mod stack;

pub use config::{SequenceConfig, StackConfig};
pub use error::ClientError;
pub use flow::Flow;
pub use receiver::{InboundMessage, InboundStream};
pub use responder::{MemoryStore, PropertyStore, Responder};
pub use sequence::{Sequence, SequenceHandle};
pub use stack::{BacnetStack, CovNotification, DiscoveredDevice};
