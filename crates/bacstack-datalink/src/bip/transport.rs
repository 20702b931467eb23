use crate::{DataLink, DataLinkAddress, DataLinkError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

/// Largest datagram accepted on receive.
pub const MAX_BIP_FRAME_LEN: usize = 1600;

/// BACnet/IP over UDP. Frames are sent as given; broadcast is enabled on the
/// socket so `255.255.255.255` destinations work.
#[derive(Debug, Clone)]
pub struct BacnetIpTransport {
    socket: Arc<UdpSocket>,
}

impl BacnetIpTransport {
    pub async fn bind(bind_addr: SocketAddr) -> Result<Self, DataLinkError> {
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.set_broadcast(true)?;
        log::debug!("bacnet/ip transport bound to {}", socket.local_addr()?);
        Ok(Self {
            socket: Arc::new(socket),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DataLinkError> {
        self.socket.local_addr().map_err(DataLinkError::Io)
    }
}

impl DataLink for BacnetIpTransport {
    async fn send(&self, address: DataLinkAddress, frame: &[u8]) -> Result<(), DataLinkError> {
        if frame.len() > usize::from(u16::MAX) {
            return Err(DataLinkError::FrameTooLarge);
        }
        self.socket
            .send_to(frame, address.as_socket_addr())
            .await?;
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, DataLinkAddress), DataLinkError> {
        let (n, src) = self.socket.recv_from(buf).await?;
        Ok((n, DataLinkAddress::Ip(src)))
    }
}
