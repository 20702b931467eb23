//! Predicate matching over inbound messages.
//!
//! A [`Flow`] is a list of filters combined with logical AND. Every predicate
//! is false when the message lacks the field it inspects, so a WhoIs never
//! matches `is_property_id`.

use crate::{ClientError, InboundMessage};
use bacstack_core::apdu::ApduType;
use bacstack_core::types::{ObjectId, PropertyId};
use bacstack_datalink::DataLinkAddress;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};

pub fn is_service_type(service_type: ApduType) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.apdu().is_some_and(|a| a.service_type() == service_type)
}

pub fn is_service_choice(choice: u8) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.apdu().is_some_and(|a| a.service_choice() == choice)
}

pub fn is_object_id(object_id: ObjectId) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.apdu().and_then(|a| a.object_id()) == Some(object_id)
}

pub fn is_property_id(property_id: PropertyId) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.apdu().and_then(|a| a.property_id()) == Some(property_id)
}

pub fn is_vendor_id(vendor_id: u32) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.apdu().and_then(|a| a.vendor_id()) == Some(vendor_id)
}

/// Matches the full source address, port included. See [`is_source_ip`]
/// for a match on the IP alone.
pub fn is_source_address(
    address: DataLinkAddress,
) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.source == address
}

pub fn is_source_ip(ip: IpAddr) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.source.ip() == ip
}

pub fn is_invoke_id(invoke_id: u8) -> impl Fn(&InboundMessage) -> bool + Send + Sync {
    move |m| m.apdu().and_then(|a| a.invoke_id()) == Some(invoke_id)
}

/// `filter` when `is_required`, otherwise always true.
pub fn require_if<F>(is_required: bool, filter: F) -> impl Fn(&InboundMessage) -> bool + Send + Sync
where
    F: Fn(&InboundMessage) -> bool + Send + Sync,
{
    move |m| !is_required || filter(m)
}

type Filter = Box<dyn Fn(&InboundMessage) -> bool + Send + Sync>;

#[derive(Default)]
pub struct Flow {
    filters: Vec<Filter>,
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl Flow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&InboundMessage) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// True when every filter accepts `message`. An empty flow matches all.
    pub fn matches(&self, message: &InboundMessage) -> bool {
        self.filters.iter().all(|f| f(message))
    }

    /// Consumes `rx` until a message matches or `timeout` elapses.
    ///
    /// Messages that do not match are discarded. A lagging receiver skips the
    /// messages it missed and keeps waiting.
    pub async fn wait(
        &self,
        rx: &mut broadcast::Receiver<InboundMessage>,
        timeout: Duration,
    ) -> Result<InboundMessage, ClientError> {
        let next_match = async {
            loop {
                match rx.recv().await {
                    Ok(message) if self.matches(&message) => return Ok(message),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        log::debug!("flow lagged, skipped {skipped} inbound messages");
                    }
                    Err(RecvError::Closed) => return Err(ClientError::StreamClosed),
                }
            }
        };
        tokio::time::timeout(timeout, next_match)
            .await
            .map_err(|_| ClientError::Timeout)?
    }
}
