use crate::apdu::pdu::{expect_type, ApduType};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::UnconfirmedService;
use crate::{DecodeError, EncodeError};

/// Header for a BACnet Unconfirmed-Request APDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnconfirmedRequestHeader {
    pub service_choice: u8,
}

impl UnconfirmedRequestHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::UnconfirmedRequest as u8) << 4)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        expect_type(r.read_u8()?, ApduType::UnconfirmedRequest)?;
        Ok(Self {
            service_choice: r.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnconfirmedRequest {
    pub service: UnconfirmedService,
}

impl UnconfirmedRequest {
    pub fn new(service: UnconfirmedService) -> Self {
        Self { service }
    }

    pub fn header(&self) -> UnconfirmedRequestHeader {
        UnconfirmedRequestHeader {
            service_choice: self.service.choice(),
        }
    }

    /// Decodes from the first byte of the APDU.
    pub fn decode(apdu: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(apdu);
        let header = UnconfirmedRequestHeader::decode(&mut r)?;
        let service = UnconfirmedService::decode(header.service_choice, &mut r)?;
        Ok(Self { service })
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        self.header().encode(w)?;
        self.service.encode(w)
    }
}
