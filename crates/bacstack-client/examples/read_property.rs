//! Read a BACnet property from a device.
//!
//! Usage:
//!   cargo run -p bacstack-client --example read_property -- --ip 192.168.1.100 --device 1

use bacstack_client::{BacnetStack, StackConfig};
use bacstack_core::services::ReadPropertyRequest;
use bacstack_core::types::{ObjectId, ObjectType, PropertyId};
use bacstack_datalink::DataLinkAddress;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn arg(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let ip: IpAddr = arg("--ip")
        .ok_or("usage: --ip <device-ip> [--device <instance>]")?
        .parse()?;
    let instance: u32 = arg("--device").unwrap_or_else(|| "1".into()).parse()?;

    let config = StackConfig::default()
        .with_bind_addr(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0));
    let stack = BacnetStack::bind(config).await?;

    let target = DataLinkAddress::bacnet_default(ip);
    let object_id = ObjectId::new(ObjectType::Device, instance)?;
    let values = stack
        .read_property(target, ReadPropertyRequest::new(object_id, PropertyId::ObjectName))
        .await?;

    println!("Device object-name: {values:?}");
    Ok(())
}
