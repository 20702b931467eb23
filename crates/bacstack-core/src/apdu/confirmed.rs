use crate::apdu::pdu::{expect_type, ApduType};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::ConfirmedService;
use crate::{DecodeError, EncodeError};

/// Largest APDU accepted code for 1476 octets.
pub const MAX_APDU_1476: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedRequestHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub segmented_response_accepted: bool,
    pub max_segments: u8,
    pub max_apdu: u8,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    /// Unsegmented header accepting 1476-octet responses.
    pub const fn new(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: false,
            max_segments: 0,
            max_apdu: MAX_APDU_1476,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::ConfirmedRequest as u8) << 4;
        if self.segmented {
            b0 |= 0b0000_1000;
        }
        if self.more_follows {
            b0 |= 0b0000_0100;
        }
        if self.segmented_response_accepted {
            b0 |= 0b0000_0010;
        }

        w.write_u8(b0)?;
        w.write_u8((self.max_segments << 4) | (self.max_apdu & 0x0f))?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        expect_type(b0, ApduType::ConfirmedRequest)?;
        let segmented = (b0 & 0b0000_1000) != 0;
        let more_follows = (b0 & 0b0000_0100) != 0;
        let segmented_response_accepted = (b0 & 0b0000_0010) != 0;
        let seg_apdu = r.read_u8()?;
        let invoke_id = r.read_u8()?;
        let (sequence_number, proposed_window_size) = if segmented {
            (Some(r.read_u8()?), Some(r.read_u8()?))
        } else {
            (None, None)
        };
        let service_choice = r.read_u8()?;
        Ok(Self {
            segmented,
            more_follows,
            segmented_response_accepted,
            max_segments: (seg_apdu >> 4) & 0x07,
            max_apdu: seg_apdu & 0x0f,
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedRequest {
    pub header: ConfirmedRequestHeader,
    pub service: ConfirmedService,
}

impl ConfirmedRequest {
    pub fn new(invoke_id: u8, service: ConfirmedService) -> Self {
        Self {
            header: ConfirmedRequestHeader::new(invoke_id, service.choice()),
            service,
        }
    }

    /// Decodes from the first byte of the APDU.
    ///
    /// A segmented header still dispatches on its service choice; the body
    /// decodes only when the segment holds the whole payload.
    pub fn decode(apdu: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(apdu);
        let header = ConfirmedRequestHeader::decode(&mut r)?;
        let service = ConfirmedService::decode(header.service_choice, &mut r)?;
        Ok(Self { header, service })
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader {
            service_choice: self.service.choice(),
            ..self.header
        }
        .encode(w)?;
        self.service.encode(w)
    }
}
