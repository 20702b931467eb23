use core::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Where a frame goes to or came from. Displays as `ip:port`, which is also
/// the key the send governor queues by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataLinkAddress {
    Ip(SocketAddr),
}

impl DataLinkAddress {
    pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

    /// `255.255.255.255:port`.
    pub fn local_broadcast(port: u16) -> Self {
        Self::Ip(SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), port))
    }

    pub fn bacnet_default(addr: IpAddr) -> Self {
        Self::Ip(SocketAddr::new(addr, Self::BACNET_IP_DEFAULT_PORT))
    }

    pub fn as_socket_addr(self) -> SocketAddr {
        match self {
            Self::Ip(addr) => addr,
        }
    }

    pub fn ip(self) -> IpAddr {
        self.as_socket_addr().ip()
    }

    pub fn port(self) -> u16 {
        self.as_socket_addr().port()
    }

    pub fn is_broadcast(self) -> bool {
        matches!(self.ip(), IpAddr::V4(v4) if v4.is_broadcast())
    }
}

impl From<SocketAddr> for DataLinkAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::Ip(addr)
    }
}

impl fmt::Display for DataLinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DataLinkAddress;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    #[test]
    fn displays_as_ip_and_port() {
        let addr = DataLinkAddress::bacnet_default(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)));
        assert_eq!(addr.to_string(), "192.168.1.20:47808");
        assert!(!addr.is_broadcast());
    }

    #[test]
    fn broadcast_key() {
        let addr = DataLinkAddress::local_broadcast(47808);
        assert_eq!(addr.to_string(), "255.255.255.255:47808");
        assert!(addr.is_broadcast());
        assert_eq!(
            DataLinkAddress::from(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9)).port(),
            9
        );
    }
}
