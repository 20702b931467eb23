//! The four implemented APDU kinds.
//!
//! [`Apdu::decode`] looks at the first byte only to pick the kind; every kind
//! then decodes from a fresh cursor over the whole APDU, re-reading its own
//! meta byte.

/// SimpleACK and ComplexACK.
pub mod ack;
/// Confirmed-service request header and PDU.
pub mod confirmed;
/// APDU type discriminant.
pub mod pdu;
/// Unconfirmed-service request header and PDU.
pub mod unconfirmed;

pub use ack::{ComplexAck, ComplexAckHeader, SimpleAck};
pub use confirmed::{ConfirmedRequest, ConfirmedRequestHeader, MAX_APDU_1476};
pub use pdu::ApduType;
pub use unconfirmed::{UnconfirmedRequest, UnconfirmedRequestHeader};

use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::{ComplexAckService, ConfirmedService, UnconfirmedService};
use crate::types::{ObjectId, PropertyId};
use crate::{DecodeError, EncodeError, Layer, ProtocolError};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Apdu {
    ConfirmedRequest(ConfirmedRequest),
    UnconfirmedRequest(UnconfirmedRequest),
    SimpleAck(SimpleAck),
    ComplexAck(ComplexAck),
}

impl Apdu {
    pub fn decode(apdu: &[u8]) -> Result<Self, ProtocolError> {
        Self::decode_kind(apdu).map_err(|e| ProtocolError::decode(Layer::Apdu, e))
    }

    fn decode_kind(apdu: &[u8]) -> Result<Self, DecodeError> {
        let meta = Reader::new(apdu).peek_u8()?;
        match ApduType::from_meta(meta) {
            Some(ApduType::ConfirmedRequest) => {
                ConfirmedRequest::decode(apdu).map(Self::ConfirmedRequest)
            }
            Some(ApduType::UnconfirmedRequest) => {
                UnconfirmedRequest::decode(apdu).map(Self::UnconfirmedRequest)
            }
            Some(ApduType::SimpleAck) => SimpleAck::decode(apdu).map(Self::SimpleAck),
            Some(ApduType::ComplexAck) => ComplexAck::decode(apdu).map(Self::ComplexAck),
            _ => Err(DecodeError::UnknownPduType(meta >> 4)),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ConfirmedRequest(p) => p.encode(w),
            Self::UnconfirmedRequest(p) => p.encode(w),
            Self::SimpleAck(p) => p.encode(w),
            Self::ComplexAck(p) => p.encode(w),
        }
    }

    pub const fn service_type(&self) -> ApduType {
        match self {
            Self::ConfirmedRequest(_) => ApduType::ConfirmedRequest,
            Self::UnconfirmedRequest(_) => ApduType::UnconfirmedRequest,
            Self::SimpleAck(_) => ApduType::SimpleAck,
            Self::ComplexAck(_) => ApduType::ComplexAck,
        }
    }

    pub fn service_choice(&self) -> u8 {
        match self {
            Self::ConfirmedRequest(p) => p.service.choice(),
            Self::UnconfirmedRequest(p) => p.service.choice(),
            Self::SimpleAck(p) => p.service_choice,
            Self::ComplexAck(p) => p.service.choice(),
        }
    }

    /// Invoke id of confirmed traffic; unconfirmed requests have none.
    pub fn invoke_id(&self) -> Option<u8> {
        match self {
            Self::ConfirmedRequest(p) => Some(p.header.invoke_id),
            Self::UnconfirmedRequest(_) => None,
            Self::SimpleAck(p) => Some(p.invoke_id),
            Self::ComplexAck(p) => Some(p.header.invoke_id),
        }
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ConfirmedRequest(p) => Some(p.service.object_id()),
            Self::UnconfirmedRequest(p) => p.service.object_id(),
            Self::SimpleAck(_) => None,
            Self::ComplexAck(p) => match &p.service {
                ComplexAckService::ReadProperty(ack) => Some(ack.object_id),
            },
        }
    }

    pub fn property_id(&self) -> Option<PropertyId> {
        match self {
            Self::ConfirmedRequest(p) => p.service.property_id(),
            Self::ComplexAck(p) => match &p.service {
                ComplexAckService::ReadProperty(ack) => Some(ack.property_id),
            },
            _ => None,
        }
    }

    /// Vendor identifier announced in an I-Am.
    pub fn vendor_id(&self) -> Option<u32> {
        match self {
            Self::UnconfirmedRequest(UnconfirmedRequest {
                service: UnconfirmedService::IAm(i_am),
            }) => Some(i_am.vendor_id),
            _ => None,
        }
    }

    pub fn confirmed_service(&self) -> Option<&ConfirmedService> {
        match self {
            Self::ConfirmedRequest(p) => Some(&p.service),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Apdu, ApduType};
    use crate::services::{ConfirmedService, ReadPropertyRequest};
    use crate::types::{ObjectType, PropertyId};
    use crate::{DecodeError, Layer};

    #[test]
    fn confirmed_read_property_literal() {
        let bytes = [
            0x00, 0x05, 0x01, 0x0c, 0x0c, 0x02, 0x00, 0x27, 0x0f, 0x19, 0x4d,
        ];
        let apdu = Apdu::decode(&bytes).unwrap();
        let Apdu::ConfirmedRequest(req) = &apdu else {
            panic!("expected confirmed request, got {apdu:?}");
        };
        assert!(!req.header.segmented);
        assert!(!req.header.more_follows);
        assert!(!req.header.segmented_response_accepted);
        assert_eq!(req.header.max_segments, 0);
        assert_eq!(req.header.max_apdu, 5);
        assert_eq!(req.header.invoke_id, 1);
        assert_eq!(req.header.service_choice, 0x0c);

        let ConfirmedService::ReadProperty(ReadPropertyRequest {
            object_id,
            property_id,
            array_index,
        }) = req.service
        else {
            panic!("expected read property");
        };
        assert_eq!(object_id.object_type(), ObjectType::Device);
        assert_eq!(object_id.instance(), 9999);
        assert_eq!(property_id, PropertyId::from_u32(77));
        assert_eq!(array_index, None);

        assert_eq!(apdu.service_type(), ApduType::ConfirmedRequest);
        assert_eq!(apdu.invoke_id(), Some(1));
        assert_eq!(apdu.property_id(), Some(PropertyId::ObjectName));
    }

    #[test]
    fn unimplemented_kinds_are_unknown_pdu_types() {
        for meta in [0x40u8, 0x50, 0x60, 0x70, 0x80] {
            let err = Apdu::decode(&[meta, 0x01, 0x02]).unwrap_err();
            assert_eq!(err.layer(), Layer::Apdu);
            assert_eq!(err.root_cause(), DecodeError::UnknownPduType(meta >> 4));
        }
    }

    #[test]
    fn empty_apdu_underruns() {
        let err = Apdu::decode(&[]).unwrap_err();
        assert_eq!(err.root_cause(), DecodeError::BufferUnderrun);
        assert_eq!(err.to_string(), "APDU - decode: Parse - buffer underrun");
    }
}
