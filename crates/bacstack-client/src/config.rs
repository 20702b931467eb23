use bacstack_datalink::DataLinkAddress;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Per-destination send limits for [`Sequence`](crate::Sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceConfig {
    /// Operations allowed in flight per destination. Clamped to at least 1.
    pub thread_limit: usize,
    /// Pause after an operation completes before its slot is released.
    pub delay: Duration,
}

impl SequenceConfig {
    pub fn new(thread_limit: usize, delay: Duration) -> Self {
        Self {
            thread_limit: thread_limit.max(1),
            delay,
        }
    }

    pub fn with_thread_limit(mut self, thread_limit: usize) -> Self {
        self.thread_limit = thread_limit.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            thread_limit: 1,
            delay: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackConfig {
    pub bind_addr: SocketAddr,
    /// UDP port Who-Is and I-Am broadcasts are sent to.
    pub broadcast_port: u16,
    pub sequence: SequenceConfig,
    pub response_timeout: Duration,
    /// Capacity of the inbound message broadcast channel.
    pub stream_capacity: usize,
}

impl StackConfig {
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_broadcast_port(mut self, port: u16) -> Self {
        self.broadcast_port = port;
        self
    }

    pub fn with_sequence(mut self, sequence: SequenceConfig) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_stream_capacity(mut self, capacity: usize) -> Self {
        self.stream_capacity = capacity.max(1);
        self
    }

    pub fn broadcast_address(&self) -> DataLinkAddress {
        DataLinkAddress::local_broadcast(self.broadcast_port)
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                DataLinkAddress::BACNET_IP_DEFAULT_PORT,
            ),
            broadcast_port: DataLinkAddress::BACNET_IP_DEFAULT_PORT,
            sequence: SequenceConfig::default(),
            response_timeout: Duration::from_secs(3),
            stream_capacity: 256,
        }
    }
}
