//! Discover BACnet devices on the local network using Who-Is.
//!
//! Usage:
//!   cargo run -p bacstack-client --example discover_devices

use bacstack_client::{BacnetStack, StackConfig};
use bacstack_core::services::WhoIsRequest;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Ephemeral local port; I-Am answers come back to it.
    let config = StackConfig::default()
        .with_bind_addr(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0));
    let stack = BacnetStack::bind(config).await?;

    let devices = stack
        .who_is(WhoIsRequest::global(), None, Duration::from_secs(3))
        .await?;

    if devices.is_empty() {
        println!("No devices found.");
    } else {
        for device in &devices {
            println!(
                "Device {} at {} (vendor {})",
                device.device_id.instance(),
                device.address,
                device.vendor_id
            );
        }
        println!("\nDiscovered {} device(s).", devices.len());
    }

    Ok(())
}
