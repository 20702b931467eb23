//! Inbound receive loop.
//!
//! Reads datagrams from a [`DataLink`], decodes them into [`InboundMessage`]s
//! and publishes them on a broadcast channel. Datagrams that fail to decode
//! are logged and dropped; only a closed data link ends the loop.

use bacstack_core::apdu::Apdu;
use bacstack_core::ProtocolError;
use bacstack_datalink::bip::transport::MAX_BIP_FRAME_LEN;
use bacstack_datalink::{decode_frame, BvlcMessage, DataLink, DataLinkAddress, DataLinkError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Pause after a failed receive before reading again.
pub const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// A decoded datagram and the address it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub source: DataLinkAddress,
    pub message: BvlcMessage,
}

impl InboundMessage {
    pub fn apdu(&self) -> Option<&Apdu> {
        self.message.npdu.as_ref()?.apdu.as_ref()
    }
}

pub fn parse_datagram(
    frame: &[u8],
    source: DataLinkAddress,
) -> Result<InboundMessage, ProtocolError> {
    Ok(InboundMessage {
        source,
        message: decode_frame(frame)?,
    })
}

/// Publishes decoded inbound messages to any number of subscribers.
#[derive(Debug, Clone)]
pub struct InboundStream {
    tx: broadcast::Sender<InboundMessage>,
}

impl InboundStream {
    pub fn subscribe(&self) -> broadcast::Receiver<InboundMessage> {
        self.tx.subscribe()
    }
}

/// Create an inbound stream and the async driver loop that feeds it.
///
/// Returns `(stream, driver)` where `driver` must be polled (e.g. via
/// `tokio::spawn`) for messages to arrive. The driver runs until the data
/// link reports [`DataLinkError::Closed`].
pub fn create_receiver<D: DataLink + 'static>(
    datalink: Arc<D>,
    capacity: usize,
) -> (InboundStream, impl Future<Output = ()> + Send) {
    let (tx, _) = broadcast::channel(capacity.max(1));
    let stream = InboundStream { tx: tx.clone() };
    let driver = async move {
        let mut buf = vec![0u8; MAX_BIP_FRAME_LEN];
        loop {
            let (n, source) = match datalink.recv(&mut buf).await {
                Ok(v) => v,
                Err(DataLinkError::Closed) => {
                    log::debug!("data link closed, receive loop stopping");
                    break;
                }
                Err(err) => {
                    log::debug!("receive failed: {err}");
                    tokio::time::sleep(RECV_ERROR_BACKOFF).await;
                    continue;
                }
            };

            match parse_datagram(&buf[..n], source) {
                Ok(message) => {
                    // No subscribers is not an error; the message is dropped.
                    let _ = tx.send(message);
                }
                Err(err) => log::debug!("dropping datagram from {source}: {err}"),
            }
        }
    };
    (stream, driver)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{create_receiver, parse_datagram, RECV_ERROR_BACKOFF};
    use bacstack_core::services::{WhoIsRequest, SERVICE_WHO_IS};
    use bacstack_datalink::builder::build_who_is;
    use bacstack_datalink::{DataLink, DataLinkAddress, DataLinkError};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{mpsc, Mutex};

    pub(crate) fn addr(port: u16) -> DataLinkAddress {
        DataLinkAddress::Ip(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port))
    }

    /// In-memory data link: frames pushed on `inbound` are received, sent
    /// frames appear on `outbound`. Receiving ends once `inbound` is dropped.
    pub(crate) struct MockDataLink {
        inbound: Mutex<mpsc::UnboundedReceiver<(DataLinkAddress, Vec<u8>)>>,
        outbound: mpsc::UnboundedSender<(DataLinkAddress, Vec<u8>)>,
    }

    pub(crate) type MockEnds = (
        mpsc::UnboundedSender<(DataLinkAddress, Vec<u8>)>,
        mpsc::UnboundedReceiver<(DataLinkAddress, Vec<u8>)>,
    );

    impl MockDataLink {
        pub(crate) fn new() -> (Self, MockEnds) {
            let (in_tx, in_rx) = mpsc::unbounded_channel();
            let (out_tx, out_rx) = mpsc::unbounded_channel();
            (
                Self {
                    inbound: Mutex::new(in_rx),
                    outbound: out_tx,
                },
                (in_tx, out_rx),
            )
        }
    }

    impl DataLink for MockDataLink {
        async fn send(&self, address: DataLinkAddress, frame: &[u8]) -> Result<(), DataLinkError> {
            self.outbound
                .send((address, frame.to_vec()))
                .map_err(|_| DataLinkError::Closed)
        }

        async fn recv(&self, buf: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError> {
            let Some((source, frame)) = self.inbound.lock().await.recv().await else {
                return Err(DataLinkError::Closed);
            };
            if frame.len() > buf.len() {
                return Err(DataLinkError::FrameTooLarge);
            }
            buf[..frame.len()].copy_from_slice(&frame);
            Ok((frame.len(), source))
        }
    }

    #[test]
    fn parse_keeps_source() {
        let frame = build_who_is(WhoIsRequest::global()).unwrap();
        let msg = parse_datagram(&frame, addr(47808)).unwrap();
        assert_eq!(msg.source, addr(47808));
        assert_eq!(msg.apdu().unwrap().service_choice(), SERVICE_WHO_IS);
    }

    #[tokio::test]
    async fn malformed_datagrams_are_dropped_and_loop_continues() {
        let (link, (inbound, _outbound)) = MockDataLink::new();
        let (stream, driver) = create_receiver(Arc::new(link), 8);
        let mut rx = stream.subscribe();
        let task = tokio::spawn(driver);

        inbound.send((addr(1), vec![0x81, 0x0A, 0x00])).unwrap();
        inbound.send((addr(2), vec![0x00, 0x01])).unwrap();
        let frame = build_who_is(WhoIsRequest::range(1, 5)).unwrap();
        inbound.send((addr(3), frame)).unwrap();

        let msg = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("valid frame delivered")
            .unwrap();
        assert_eq!(msg.source, addr(3));

        drop(inbound);
        tokio::time::timeout(Duration::from_millis(500), task)
            .await
            .expect("driver stops when link closes")
            .unwrap();
    }

    /// Fails every receive with a socket error.
    struct FailingDataLink {
        recv_calls: AtomicUsize,
    }

    impl DataLink for FailingDataLink {
        async fn send(&self, _: DataLinkAddress, _: &[u8]) -> Result<(), DataLinkError> {
            Ok(())
        }

        async fn recv(&self, _: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError> {
            self.recv_calls.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::from(io::ErrorKind::ConnectionReset).into())
        }
    }

    #[tokio::test]
    async fn persistent_recv_errors_back_off() {
        let link = Arc::new(FailingDataLink {
            recv_calls: AtomicUsize::new(0),
        });
        let (_stream, driver) = create_receiver(link.clone(), 8);
        let task = tokio::spawn(driver);

        tokio::time::sleep(RECV_ERROR_BACKOFF * 3).await;
        task.abort();
        let calls = link.recv_calls.load(Ordering::SeqCst);
        assert!((1..=5).contains(&calls), "{calls} receives");
    }
}
