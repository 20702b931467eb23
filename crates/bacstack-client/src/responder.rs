//! Answers inbound Who-Is, ReadProperty and WriteProperty requests from a
//! [`PropertyStore`].
//!
//! The responder holds no object model of its own: whatever the store
//! returns is sent back verbatim, and writes are accepted or refused by the
//! store.

use crate::{ClientError, InboundMessage, Sequence};
use bacstack_core::apdu::Apdu;
use bacstack_core::services::i_am::SEGMENTATION_NONE;
use bacstack_core::services::{
    ConfirmedService, IAmRequest, ReadPropertyAck, UnconfirmedService, SERVICE_WRITE_PROPERTY,
};
use bacstack_core::types::{ObjectId, ObjectType, PropertyId};
use bacstack_core::value::Value;
use bacstack_datalink::builder::{build_i_am, build_read_property_ack, build_simple_ack};
use bacstack_datalink::{DataLink, DataLinkAddress};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast::{self, error::RecvError};

/// Source of property values served to remote readers.
pub trait PropertyStore: Send + Sync {
    /// Current value list of `property_id` on `object_id`, or `None` when the
    /// store does not know it.
    fn property(&self, object_id: ObjectId, property_id: PropertyId) -> Option<Vec<Value>>;

    /// Applies a remote write. Returns `false` to refuse it.
    fn set_property(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        values: Vec<Value>,
        priority: Option<u8>,
    ) -> bool;
}

/// A [`PropertyStore`] backed by a map. Writes to known objects always
/// succeed; the priority is ignored.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<ObjectId, HashMap<PropertyId, Vec<Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, object_id: ObjectId, property_id: PropertyId, values: Vec<Value>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(object_id)
            .or_default()
            .insert(property_id, values);
    }
}

impl PropertyStore for MemoryStore {
    fn property(&self, object_id: ObjectId, property_id: PropertyId) -> Option<Vec<Value>> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&object_id)?
            .get(&property_id)
            .cloned()
    }

    fn set_property(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        values: Vec<Value>,
        _priority: Option<u8>,
    ) -> bool {
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        match objects.get_mut(&object_id) {
            Some(properties) => {
                properties.insert(property_id, values);
                true
            }
            None => false,
        }
    }
}

/// A device identity plus the store that answers for it.
#[derive(Debug)]
pub struct Responder<S> {
    identity: IAmRequest,
    store: Arc<S>,
}

impl<S: PropertyStore + 'static> Responder<S> {
    pub fn new(instance: u32, vendor_id: u32, store: Arc<S>) -> Result<Self, ClientError> {
        Ok(Self {
            identity: IAmRequest {
                device_id: ObjectId::new(ObjectType::Device, instance)?,
                max_apdu: 1476,
                segmentation: SEGMENTATION_NONE,
                vendor_id,
            },
            store,
        })
    }

    pub fn device_id(&self) -> ObjectId {
        self.identity.device_id
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The reply frame for `message`, if it warrants one.
    pub fn respond(&self, message: &InboundMessage) -> Result<Option<Vec<u8>>, ClientError> {
        let Some(apdu) = message.apdu() else {
            return Ok(None);
        };
        let reply = match apdu {
            Apdu::UnconfirmedRequest(req) => match &req.service {
                UnconfirmedService::WhoIs(who_is)
                    if who_is.matches(self.identity.device_id.instance()) =>
                {
                    Some(build_i_am(self.identity)?)
                }
                _ => None,
            },
            Apdu::ConfirmedRequest(req) => {
                let invoke_id = req.header.invoke_id;
                match &req.service {
                    ConfirmedService::ReadProperty(rp) => {
                        match self.store.property(rp.object_id, rp.property_id) {
                            Some(values) => Some(build_read_property_ack(
                                invoke_id,
                                ReadPropertyAck {
                                    object_id: rp.object_id,
                                    property_id: rp.property_id,
                                    array_index: rp.array_index,
                                    values,
                                },
                            )?),
                            None => {
                                log::debug!(
                                    "no value for {:?} {:?}, not answering",
                                    rp.object_id,
                                    rp.property_id
                                );
                                None
                            }
                        }
                    }
                    ConfirmedService::WriteProperty(wp) => {
                        if self.store.set_property(
                            wp.object_id,
                            wp.property_id,
                            wp.values.clone(),
                            wp.priority,
                        ) {
                            Some(build_simple_ack(invoke_id, SERVICE_WRITE_PROPERTY)?)
                        } else {
                            log::debug!("write to {:?} refused", wp.object_id);
                            None
                        }
                    }
                    ConfirmedService::SubscribeCov(_) => None,
                }
            }
            _ => None,
        };
        Ok(reply)
    }

    /// Answers messages from `rx` until the stream closes. Replies are
    /// queued on `sequence`, so they are paced like any other send to the
    /// same peer.
    pub async fn run<D: DataLink + 'static>(
        self,
        datalink: Arc<D>,
        sequence: Sequence<DataLinkAddress>,
        mut rx: broadcast::Receiver<InboundMessage>,
    ) {
        loop {
            let message = match rx.recv().await {
                Ok(message) => message,
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("responder lagged, skipped {skipped} messages");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match self.respond(&message) {
                Ok(Some(frame)) => {
                    // Failed sends are logged by the sequence.
                    let _ = sequence.send(datalink.clone(), message.source, frame);
                }
                Ok(None) => {}
                Err(err) => log::debug!("could not build reply to {}: {err}", message.source),
            }
        }
    }
}
