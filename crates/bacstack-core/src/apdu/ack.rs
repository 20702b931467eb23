use crate::apdu::pdu::{expect_type, ApduType};
use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::{check_simple_ack_choice, ComplexAckService};
use crate::{DecodeError, EncodeError};

/// Bodiless acknowledgement for SubscribeCOV and WriteProperty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::SimpleAck as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(apdu: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(apdu);
        expect_type(r.read_u8()?, ApduType::SimpleAck)?;
        let invoke_id = r.read_u8()?;
        let service_choice = check_simple_ack_choice(r.read_u8()?)?;
        Ok(Self {
            invoke_id,
            service_choice,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexAckHeader {
    pub segmented: bool,
    pub more_follows: bool,
    pub invoke_id: u8,
    pub sequence_number: Option<u8>,
    pub proposed_window_size: Option<u8>,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub const fn new(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            segmented: false,
            more_follows: false,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let mut b0 = (ApduType::ComplexAck as u8) << 4;
        if self.segmented {
            b0 |= 0b0000_1000;
        }
        if self.more_follows {
            b0 |= 0b0000_0100;
        }
        w.write_u8(b0)?;
        w.write_u8(self.invoke_id)?;
        if self.segmented {
            w.write_u8(self.sequence_number.unwrap_or(0))?;
            w.write_u8(self.proposed_window_size.unwrap_or(1))?;
        }
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        expect_type(b0, ApduType::ComplexAck)?;

        let segmented = (b0 & 0b0000_1000) != 0;
        let more_follows = (b0 & 0b0000_0100) != 0;
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
            invoke_id,
            sequence_number,
            proposed_window_size,
            service_choice,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexAck {
    pub header: ComplexAckHeader,
    pub service: ComplexAckService,
}

impl ComplexAck {
    pub fn new(invoke_id: u8, service: ComplexAckService) -> Self {
        Self {
            header: ComplexAckHeader::new(invoke_id, service.choice()),
            service,
        }
    }

    /// Decodes from the first byte of the APDU. Segmented acks are not
    /// reassembled; the segment must carry the whole service body.
    pub fn decode(apdu: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(apdu);
        let header = ComplexAckHeader::decode(&mut r)?;
        let service = ComplexAckService::decode(header.service_choice, &mut r)?;
        Ok(Self { header, service })
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ComplexAckHeader {
            service_choice: self.service.choice(),
            ..self.header
        }
        .encode(w)?;
        self.service.encode(w)
    }
}

#[cfg(test)]
mod tests {
    use super::{ComplexAck, SimpleAck};
    use crate::encoding::writer::Writer;
    use crate::services::{ComplexAckService, ReadPropertyAck};
    use crate::types::{ObjectId, ObjectType, PropertyId};
    use crate::value::Value;
    use crate::DecodeError;

    #[test]
    fn simple_ack_for_write_property() {
        let ack = SimpleAck::decode(&[0x20, 0x07, 0x0F]).unwrap();
        assert_eq!(ack.invoke_id, 7);
        assert_eq!(ack.service_choice, 0x0F);
        assert_eq!(
            SimpleAck::decode(&[0x20, 0x07, 0x33]).unwrap_err(),
            DecodeError::UnknownServiceChoice(0x33)
        );
    }

    #[test]
    fn complex_ack_roundtrip() {
        let ack = ComplexAck::new(
            1,
            ComplexAckService::ReadProperty(ReadPropertyAck {
                object_id: ObjectId::new(ObjectType::Device, 9999).unwrap(),
                property_id: PropertyId::ObjectName,
                array_index: None,
                values: vec![Value::character_string("AHU-1")],
            }),
        );
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        ack.encode(&mut w).unwrap();
        assert_eq!(&w.as_written()[..3], &[0x30, 0x01, 0x0C]);
        assert_eq!(ComplexAck::decode(w.as_written()).unwrap(), ack);
    }

    #[test]
    fn segmented_complex_ack_reads_sequence_fields() {
        let mut ack = ComplexAck::new(
            2,
            ComplexAckService::ReadProperty(ReadPropertyAck {
                object_id: ObjectId::new(ObjectType::AnalogValue, 1).unwrap(),
                property_id: PropertyId::PresentValue,
                array_index: None,
                values: vec![Value::real(20.5).unwrap()],
            }),
        );
        ack.header.segmented = true;
        ack.header.more_follows = true;
        ack.header.sequence_number = Some(3);
        ack.header.proposed_window_size = Some(1);
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        ack.encode(&mut w).unwrap();
        assert_eq!(&w.as_written()[..5], &[0x3C, 0x02, 0x03, 0x01, 0x0C]);
        assert_eq!(ComplexAck::decode(w.as_written()).unwrap(), ack);
    }
}
