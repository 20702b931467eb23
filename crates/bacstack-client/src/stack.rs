use crate::flow::{
    is_invoke_id, is_object_id, is_service_choice, is_service_type, is_source_address,
    is_vendor_id, require_if, Flow,
};
use crate::receiver::{create_receiver, InboundStream};
use crate::{
    ClientError, InboundMessage, PropertyStore, Responder, Sequence, SequenceHandle, StackConfig,
};
use bacstack_core::apdu::{Apdu, ApduType};
use bacstack_core::services::{
    ComplexAckService, CovNotificationRequest, IAmRequest, ReadPropertyRequest,
    SubscribeCovRequest, UnconfirmedService, WhoIsRequest, WritePropertyRequest, SERVICE_I_AM,
    SERVICE_READ_PROPERTY, SERVICE_SUBSCRIBE_COV, SERVICE_UNCONFIRMED_COV_NOTIFICATION,
    SERVICE_WRITE_PROPERTY,
};
use bacstack_core::types::ObjectId;
use bacstack_core::value::Value;
use bacstack_core::EncodeError;
use bacstack_datalink::builder::{
    build_i_am, build_read_property, build_subscribe_cov, build_who_is, build_write_property,
};
use bacstack_datalink::{BacnetIpTransport, DataLink, DataLinkAddress};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A device that answered a Who-Is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoveredDevice {
    pub address: DataLinkAddress,
    pub device_id: ObjectId,
    pub max_apdu: u32,
    pub segmentation: u32,
    pub vendor_id: u32,
}

/// A COV notification and the address it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CovNotification {
    pub source: DataLinkAddress,
    pub notification: CovNotificationRequest,
}

/// High-level BACnet/IP endpoint.
///
/// Outbound frames go through a per-destination [`Sequence`]; inbound
/// datagrams are decoded by a background receive task and published to every
/// [`subscribe`](Self::subscribe)r. Requests are correlated to responses with
/// a [`Flow`].
#[derive(Debug)]
pub struct BacnetStack<D> {
    datalink: Arc<D>,
    config: StackConfig,
    sequence: Sequence<DataLinkAddress>,
    inbound: InboundStream,
    receiver: JoinHandle<()>,
    invoke_id: Mutex<u8>,
}

impl BacnetStack<BacnetIpTransport> {
    /// Binds a UDP socket at `config.bind_addr` and starts receiving.
    pub async fn bind(config: StackConfig) -> Result<Self, ClientError> {
        let datalink = BacnetIpTransport::bind(config.bind_addr).await?;
        Ok(Self::with_datalink(datalink, config))
    }
}

impl<D: DataLink + 'static> BacnetStack<D> {
    /// Must be called from within a tokio runtime.
    pub fn with_datalink(datalink: D, config: StackConfig) -> Self {
        let datalink = Arc::new(datalink);
        let (inbound, driver) = create_receiver(datalink.clone(), config.stream_capacity);
        let receiver = tokio::spawn(driver);
        Self {
            datalink,
            sequence: Sequence::new(config.sequence),
            config,
            inbound,
            receiver,
            invoke_id: Mutex::new(1),
        }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn datalink(&self) -> &Arc<D> {
        &self.datalink
    }

    pub fn sequence(&self) -> &Sequence<DataLinkAddress> {
        &self.sequence
    }

    /// A receiver for every inbound message decoded from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<InboundMessage> {
        self.inbound.subscribe()
    }

    fn next_invoke_id(&self) -> u8 {
        let mut next = self.invoke_id.lock().unwrap_or_else(PoisonError::into_inner);
        let id = *next;
        *next = next.wrapping_add(1);
        if *next == 0 {
            *next = 1;
        }
        id
    }

    /// Queues `frame` for `target` behind earlier sends to the same address.
    pub fn send_frame(&self, target: DataLinkAddress, frame: Vec<u8>) -> SequenceHandle<()> {
        self.sequence.send(self.datalink.clone(), target, frame)
    }

    /// Starts answering inbound requests with `responder`. Replies share the
    /// per-destination sequence with every other send. The task stops when
    /// the stack is dropped.
    pub fn serve<S: PropertyStore + 'static>(&self, responder: Responder<S>) -> JoinHandle<()> {
        tokio::spawn(responder.run(
            self.datalink.clone(),
            self.sequence.clone(),
            self.subscribe(),
        ))
    }

    async fn confirmed(
        &self,
        target: DataLinkAddress,
        service_choice: u8,
        response: ApduType,
        build: impl FnOnce(u8) -> Result<Vec<u8>, EncodeError>,
    ) -> Result<InboundMessage, ClientError> {
        let invoke_id = self.next_invoke_id();
        let frame = build(invoke_id)?;
        let mut rx = self.subscribe();
        self.send_frame(target, frame).await?;
        Flow::new()
            .filter(is_source_address(target))
            .filter(is_service_type(response))
            .filter(is_service_choice(service_choice))
            .filter(is_invoke_id(invoke_id))
            .wait(&mut rx, self.config.response_timeout)
            .await
    }

    pub async fn read_property(
        &self,
        target: DataLinkAddress,
        request: ReadPropertyRequest,
    ) -> Result<Vec<Value>, ClientError> {
        let response = self
            .confirmed(target, SERVICE_READ_PROPERTY, ApduType::ComplexAck, |id| {
                build_read_property(id, request)
            })
            .await?;
        match response.apdu() {
            Some(Apdu::ComplexAck(ack)) => {
                let ComplexAckService::ReadProperty(rp) = &ack.service;
                Ok(rp.values.clone())
            }
            _ => Err(ClientError::UnexpectedResponse {
                service_choice: SERVICE_READ_PROPERTY,
            }),
        }
    }

    pub async fn write_property(
        &self,
        target: DataLinkAddress,
        request: WritePropertyRequest,
    ) -> Result<(), ClientError> {
        self.confirmed(target, SERVICE_WRITE_PROPERTY, ApduType::SimpleAck, |id| {
            build_write_property(id, request)
        })
        .await?;
        Ok(())
    }

    pub async fn subscribe_cov(
        &self,
        target: DataLinkAddress,
        request: SubscribeCovRequest,
    ) -> Result<(), ClientError> {
        self.confirmed(target, SERVICE_SUBSCRIBE_COV, ApduType::SimpleAck, |id| {
            build_subscribe_cov(id, request)
        })
        .await?;
        Ok(())
    }

    /// Broadcasts `request` and collects I-Am answers for `wait`, one per
    /// source address. With `vendor_id` set, other vendors are ignored.
    pub async fn who_is(
        &self,
        request: WhoIsRequest,
        vendor_id: Option<u32>,
        wait: Duration,
    ) -> Result<Vec<DiscoveredDevice>, ClientError> {
        let mut rx = self.subscribe();
        self.send_frame(self.config.broadcast_address(), build_who_is(request)?)
            .await?;

        let flow = Flow::new()
            .filter(is_service_type(ApduType::UnconfirmedRequest))
            .filter(is_service_choice(SERVICE_I_AM))
            .filter(require_if(
                vendor_id.is_some(),
                is_vendor_id(vendor_id.unwrap_or_default()),
            ));
        let deadline = Instant::now() + wait;
        let mut seen = HashSet::new();
        let mut devices = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let message = match flow.wait(&mut rx, remaining).await {
                Ok(message) => message,
                Err(ClientError::Timeout) => break,
                Err(err) => return Err(err),
            };
            let Some(Apdu::UnconfirmedRequest(req)) = message.apdu() else {
                continue;
            };
            let UnconfirmedService::IAm(i_am) = &req.service else {
                continue;
            };
            if !request.matches(i_am.device_id.instance()) {
                continue;
            }
            if seen.insert(message.source) {
                devices.push(DiscoveredDevice {
                    address: message.source,
                    device_id: i_am.device_id,
                    max_apdu: i_am.max_apdu,
                    segmentation: i_am.segmentation,
                    vendor_id: i_am.vendor_id,
                });
            }
        }
        Ok(devices)
    }

    /// Announces `identity` to the local broadcast address.
    pub async fn i_am(&self, identity: IAmRequest) -> Result<(), ClientError> {
        self.send_frame(self.config.broadcast_address(), build_i_am(identity)?)
            .await
    }

    /// Waits on `rx` for an unconfirmed COV notification, optionally only
    /// for `monitored`.
    pub async fn recv_cov_notification(
        &self,
        rx: &mut broadcast::Receiver<InboundMessage>,
        monitored: Option<ObjectId>,
        wait: Duration,
    ) -> Result<CovNotification, ClientError> {
        let message = Flow::new()
            .filter(is_service_type(ApduType::UnconfirmedRequest))
            .filter(is_service_choice(SERVICE_UNCONFIRMED_COV_NOTIFICATION))
            .filter(require_if(
                monitored.is_some(),
                is_object_id(monitored.unwrap_or(ObjectId::from_raw(0))),
            ))
            .wait(rx, wait)
            .await?;
        match message.apdu() {
            Some(Apdu::UnconfirmedRequest(req)) => match &req.service {
                UnconfirmedService::CovNotification(notification) => Ok(CovNotification {
                    source: message.source,
                    notification: notification.clone(),
                }),
                _ => Err(ClientError::UnexpectedResponse {
                    service_choice: SERVICE_UNCONFIRMED_COV_NOTIFICATION,
                }),
            },
            _ => Err(ClientError::UnexpectedResponse {
                service_choice: SERVICE_UNCONFIRMED_COV_NOTIFICATION,
            }),
        }
    }
}

impl<D> Drop for BacnetStack<D> {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}
