use bacstack_core::encoding::{reader::Reader, writer::Writer};
use bacstack_core::npdu::NpduMessage;
use bacstack_core::{DecodeError, EncodeError, Layer, ProtocolError};
use std::net::{Ipv4Addr, SocketAddrV4};

pub const BVLC_TYPE_BIP: u8 = 0x81;
pub const BVLC_HEADER_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BvlcFunction {
    Result,
    WriteBroadcastDistributionTable,
    ReadBroadcastDistributionTable,
    ReadBroadcastDistributionTableAck,
    ForwardedNpdu,
    RegisterForeignDevice,
    ReadForeignDeviceTable,
    ReadForeignDeviceTableAck,
    DeleteForeignDeviceTableEntry,
    DistributeBroadcastToNetwork,
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
    Unknown(u8),
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Result,
            0x01 => Self::WriteBroadcastDistributionTable,
            0x02 => Self::ReadBroadcastDistributionTable,
            0x03 => Self::ReadBroadcastDistributionTableAck,
            0x04 => Self::ForwardedNpdu,
            0x05 => Self::RegisterForeignDevice,
            0x06 => Self::ReadForeignDeviceTable,
            0x07 => Self::ReadForeignDeviceTableAck,
            0x08 => Self::DeleteForeignDeviceTableEntry,
            0x09 => Self::DistributeBroadcastToNetwork,
            0x0A => Self::OriginalUnicastNpdu,
            0x0B => Self::OriginalBroadcastNpdu,
            v => Self::Unknown(v),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Result => 0x00,
            Self::WriteBroadcastDistributionTable => 0x01,
            Self::ReadBroadcastDistributionTable => 0x02,
            Self::ReadBroadcastDistributionTableAck => 0x03,
            Self::ForwardedNpdu => 0x04,
            Self::RegisterForeignDevice => 0x05,
            Self::ReadForeignDeviceTable => 0x06,
            Self::ReadForeignDeviceTableAck => 0x07,
            Self::DeleteForeignDeviceTableEntry => 0x08,
            Self::DistributeBroadcastToNetwork => 0x09,
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
            Self::Unknown(v) => v,
        }
    }

    /// Functions whose payload is an NPDU.
    pub const fn carries_npdu(self) -> bool {
        matches!(
            self,
            Self::OriginalUnicastNpdu
                | Self::OriginalBroadcastNpdu
                | Self::DistributeBroadcastToNetwork
                | Self::ForwardedNpdu
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BvlcHeader {
    pub function: BvlcFunction,
    pub length: u16,
}

impl BvlcHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(BVLC_TYPE_BIP)?;
        w.write_u8(self.function.to_u8())?;
        w.write_be_u16(self.length)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != BVLC_TYPE_BIP {
            return Err(DecodeError::InvalidValue);
        }
        let function = BvlcFunction::from_u8(r.read_u8()?);
        let length = r.read_be_u16()?;
        if (length as usize) < BVLC_HEADER_LEN {
            return Err(DecodeError::InvalidLength);
        }
        Ok(Self { function, length })
    }
}

/// A decoded BACnet/IP datagram.
///
/// `npdu` is set for the NPDU-carrying functions; BBMD management frames
/// are surfaced with their header only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BvlcMessage {
    pub header: BvlcHeader,
    /// Original source of a Forwarded-NPDU.
    pub origin: Option<SocketAddrV4>,
    pub npdu: Option<NpduMessage>,
}

impl BvlcMessage {
    /// Decodes the header and the first `length - 4` payload bytes. Bytes
    /// after `length` are ignored.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        let scoped = |e| ProtocolError::decode(Layer::Bvlc, e);
        let mut r = Reader::new(buf);
        let header = BvlcHeader::decode(&mut r).map_err(scoped)?;
        let mut payload = Reader::new(
            r.read_exact(header.length as usize - BVLC_HEADER_LEN)
                .map_err(scoped)?,
        );

        let origin = if header.function == BvlcFunction::ForwardedNpdu {
            let ip = payload.read_be_u32().map_err(scoped)?;
            let port = payload.read_be_u16().map_err(scoped)?;
            Some(SocketAddrV4::new(Ipv4Addr::from(ip), port))
        } else {
            None
        };

        let npdu = if header.function.carries_npdu() {
            let npdu = NpduMessage::decode(payload.rest())
                .map_err(|e| ProtocolError::wrap(Layer::Bvlc, e))?;
            Some(npdu)
        } else {
            None
        };

        Ok(Self {
            header,
            origin,
            npdu,
        })
    }
}

/// Concatenates header, NPDU and APDU bytes. The length field is always
/// `4 + npdu.len() + apdu.len()`.
pub fn encode_frame(
    function: BvlcFunction,
    npdu: &[u8],
    apdu: &[u8],
) -> Result<Vec<u8>, EncodeError> {
    let total = BVLC_HEADER_LEN + npdu.len() + apdu.len();
    let length = u16::try_from(total).map_err(|_| EncodeError::InvalidLength)?;
    let mut frame = vec![0u8; total];
    let mut w = Writer::new(&mut frame);
    BvlcHeader { function, length }.encode(&mut w)?;
    w.write_all(npdu)?;
    w.write_all(apdu)?;
    Ok(frame)
}
