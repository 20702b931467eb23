use crate::apdu::Apdu;
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError, Layer, ProtocolError};

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;
/// Network number addressing every network.
pub const GLOBAL_BROADCAST_NETWORK: u16 = 0xFFFF;
pub const DEFAULT_HOP_COUNT: u8 = 0xFF;

/// The NPDU control octet, one field per bit from bit 7 down to bit 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpduControl {
    pub no_apdu_message_type: bool,
    pub reserved1: bool,
    pub dest_specifier: bool,
    pub reserved2: bool,
    pub src_specifier: bool,
    pub expecting_reply: bool,
    pub priority1: bool,
    pub priority2: bool,
}

impl NpduControl {
    pub const fn from_byte(b: u8) -> Self {
        Self {
            no_apdu_message_type: b & 0x80 != 0,
            reserved1: b & 0x40 != 0,
            dest_specifier: b & 0x20 != 0,
            reserved2: b & 0x10 != 0,
            src_specifier: b & 0x08 != 0,
            expecting_reply: b & 0x04 != 0,
            priority1: b & 0x02 != 0,
            priority2: b & 0x01 != 0,
        }
    }

    pub const fn to_byte(self) -> u8 {
        (self.no_apdu_message_type as u8) << 7
            | (self.reserved1 as u8) << 6
            | (self.dest_specifier as u8) << 5
            | (self.reserved2 as u8) << 4
            | (self.src_specifier as u8) << 3
            | (self.expecting_reply as u8) << 2
            | (self.priority1 as u8) << 1
            | self.priority2 as u8
    }
}

/// A network-layer address consisting of a network number and a MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpduAddress {
    /// The DNET/SNET network number.
    pub network: u16,
    /// MAC address bytes (up to 6).
    pub mac: [u8; 6],
    /// Number of valid bytes in `mac`.
    pub mac_len: u8,
}

impl NpduAddress {
    /// Every device on every network: network `0xFFFF`, empty MAC.
    pub const fn global_broadcast() -> Self {
        Self {
            network: GLOBAL_BROADCAST_NETWORK,
            mac: [0; 6],
            mac_len: 0,
        }
    }

    pub fn mac(&self) -> &[u8] {
        &self.mac[..(self.mac_len as usize).min(6)]
    }
}

/// BACnet Network Protocol Data Unit (NPDU) header.
///
/// The optional address blocks and hop count are present on the wire exactly
/// when the matching [`NpduControl`] flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npdu {
    pub version: u8,
    pub control: NpduControl,
    pub destination: Option<NpduAddress>,
    pub source: Option<NpduAddress>,
    pub hop_count: Option<u8>,
    pub message_type: Option<u8>,
    pub vendor_id: Option<u16>,
}

impl Default for Npdu {
    fn default() -> Self {
        Self::new(NpduControl::default())
    }
}

impl Npdu {
    pub const fn new(control: NpduControl) -> Self {
        Self {
            version: NPDU_VERSION,
            control,
            destination: None,
            source: None,
            hop_count: None,
            message_type: None,
            vendor_id: None,
        }
    }

    /// Header for a global broadcast: destination `0xFFFF`, hop count 255.
    pub fn global_broadcast() -> Self {
        let mut npdu = Self::new(NpduControl {
            dest_specifier: true,
            ..NpduControl::default()
        });
        npdu.destination = Some(NpduAddress::global_broadcast());
        npdu.hop_count = Some(DEFAULT_HOP_COUNT);
        npdu
    }

    /// True for network-layer messages, which carry no APDU.
    pub const fn is_network_message(&self) -> bool {
        self.control.no_apdu_message_type
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(self.version)?;
        w.write_u8(self.control.to_byte())?;

        if self.control.dest_specifier {
            let dest = self
                .destination
                .ok_or(EncodeError::Message("destination flag set without address"))?;
            encode_addr(w, dest)?;
        }
        if self.control.src_specifier {
            let src = self
                .source
                .ok_or(EncodeError::Message("source flag set without address"))?;
            encode_addr(w, src)?;
        }
        if self.control.dest_specifier {
            w.write_u8(self.hop_count.unwrap_or(DEFAULT_HOP_COUNT))?;
        }
        if self.control.no_apdu_message_type {
            let message_type = self.message_type.unwrap_or(0);
            w.write_u8(message_type)?;
            if message_type >= 0x80 {
                w.write_be_u16(self.vendor_id.unwrap_or(0))?;
            }
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let version = r.read_u8()?;
        if version != NPDU_VERSION {
            return Err(DecodeError::InvalidValue);
        }

        let control = NpduControl::from_byte(r.read_u8()?);
        let destination = if control.dest_specifier {
            Some(decode_addr(r)?)
        } else {
            None
        };
        let source = if control.src_specifier {
            Some(decode_addr(r)?)
        } else {
            None
        };
        let hop_count = if control.dest_specifier {
            Some(r.read_u8()?)
        } else {
            None
        };

        let (message_type, vendor_id) = if control.no_apdu_message_type {
            let mt = r.read_u8()?;
            let vid = if mt >= 0x80 {
                Some(r.read_be_u16()?)
            } else {
                None
            };
            (Some(mt), vid)
        } else {
            (None, None)
        };

        Ok(Self {
            version,
            control,
            destination,
            source,
            hop_count,
            message_type,
            vendor_id,
        })
    }
}

fn encode_addr(w: &mut Writer<'_>, addr: NpduAddress) -> Result<(), EncodeError> {
    if addr.mac_len as usize > addr.mac.len() {
        return Err(EncodeError::InvalidLength);
    }
    w.write_be_u16(addr.network)?;
    w.write_u8(addr.mac_len)?;
    w.write_all(addr.mac())
}

fn decode_addr(r: &mut Reader<'_>) -> Result<NpduAddress, DecodeError> {
    let network = r.read_be_u16()?;
    let mac_len = r.read_u8()?;
    if mac_len as usize > 6 {
        return Err(DecodeError::InvalidLength);
    }
    let mut mac = [0u8; 6];
    let src = r.read_exact(mac_len as usize)?;
    mac[..mac_len as usize].copy_from_slice(src);
    Ok(NpduAddress {
        network,
        mac,
        mac_len,
    })
}

/// A decoded network layer message: the NPDU header and, unless this is a
/// network-layer message, the APDU it carries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpduMessage {
    pub header: Npdu,
    pub apdu: Option<Apdu>,
}

impl NpduMessage {
    pub fn new(header: Npdu, apdu: Apdu) -> Self {
        Self {
            header,
            apdu: Some(apdu),
        }
    }

    /// Decodes the header and hands the remaining bytes to [`Apdu::decode`].
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = Reader::new(buf);
        let header = Npdu::decode(&mut r).map_err(|e| ProtocolError::decode(Layer::Npdu, e))?;
        if header.is_network_message() {
            return Ok(Self { header, apdu: None });
        }
        let apdu = Apdu::decode(r.rest()).map_err(|e| ProtocolError::wrap(Layer::Npdu, e))?;
        Ok(Self {
            header,
            apdu: Some(apdu),
        })
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.header.encode(w)?;
        if let Some(apdu) = &self.apdu {
            apdu.encode(w)?;
        }
        Ok(())
    }
}
