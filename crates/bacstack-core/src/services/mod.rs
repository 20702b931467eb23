//! Service payload codecs and the service-choice dispatch used by the APDU
//! variants.
//!
//! Payload types encode and decode only their own body; the surrounding APDU
//! header is written by [`crate::apdu`].

pub mod cov_notification;
pub mod i_am;
pub mod read_property;
pub mod subscribe_cov;
pub mod who_is;
pub mod write_property;

pub use cov_notification::{
    CovNotificationRequest, CovPropertyValue, SERVICE_UNCONFIRMED_COV_NOTIFICATION,
};
pub use i_am::{IAmRequest, SERVICE_I_AM};
pub use read_property::{ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY};
pub use subscribe_cov::{SubscribeCovRequest, SERVICE_SUBSCRIBE_COV};
pub use who_is::{WhoIsRequest, SERVICE_WHO_IS};
pub use write_property::{WritePropertyRequest, SERVICE_WRITE_PROPERTY};

use crate::encoding::{reader::Reader, tag::Tag, writer::Writer};
use crate::types::{ObjectId, PropertyId};
use crate::value::{ObjectIdentifier, Primitive, Unsigned};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_PROPERTY_MULTIPLE: u8 = 0x0E;
pub const SERVICE_WRITE_PROPERTY_MULTIPLE: u8 = 0x10;

pub const SERVICE_I_HAVE: u8 = 0x01;
pub const SERVICE_UNCONFIRMED_EVENT_NOTIFICATION: u8 = 0x03;
pub const SERVICE_WHO_HAS: u8 = 0x07;

const KNOWN_CONFIRMED: [u8; 5] = [
    SERVICE_SUBSCRIBE_COV,
    SERVICE_READ_PROPERTY,
    SERVICE_READ_PROPERTY_MULTIPLE,
    SERVICE_WRITE_PROPERTY,
    SERVICE_WRITE_PROPERTY_MULTIPLE,
];

const KNOWN_UNCONFIRMED: [u8; 6] = [
    SERVICE_I_AM,
    SERVICE_I_HAVE,
    SERVICE_UNCONFIRMED_COV_NOTIFICATION,
    SERVICE_UNCONFIRMED_EVENT_NOTIFICATION,
    SERVICE_WHO_HAS,
    SERVICE_WHO_IS,
];

/// A recognised choice without a codec is `Unsupported`; anything else is
/// unknown.
fn reject_choice(choice: u8, known: &[u8]) -> DecodeError {
    if known.contains(&choice) {
        DecodeError::Unsupported
    } else {
        DecodeError::UnknownServiceChoice(choice)
    }
}

/// Services carried by a ConfirmedRequest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfirmedService {
    ReadProperty(ReadPropertyRequest),
    SubscribeCov(SubscribeCovRequest),
    WriteProperty(WritePropertyRequest),
}

impl ConfirmedService {
    pub const fn choice(&self) -> u8 {
        match self {
            Self::ReadProperty(_) => SERVICE_READ_PROPERTY,
            Self::SubscribeCov(_) => SERVICE_SUBSCRIBE_COV,
            Self::WriteProperty(_) => SERVICE_WRITE_PROPERTY,
        }
    }

    pub fn decode(choice: u8, r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match choice {
            SERVICE_READ_PROPERTY => ReadPropertyRequest::decode(r).map(Self::ReadProperty),
            SERVICE_SUBSCRIBE_COV => SubscribeCovRequest::decode(r).map(Self::SubscribeCov),
            SERVICE_WRITE_PROPERTY => WritePropertyRequest::decode(r).map(Self::WriteProperty),
            other => Err(reject_choice(other, &KNOWN_CONFIRMED)),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ReadProperty(s) => s.encode(w),
            Self::SubscribeCov(s) => s.encode(w),
            Self::WriteProperty(s) => s.encode(w),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        match self {
            Self::ReadProperty(s) => s.object_id,
            Self::SubscribeCov(s) => s.monitored_object_id,
            Self::WriteProperty(s) => s.object_id,
        }
    }

    pub fn property_id(&self) -> Option<PropertyId> {
        match self {
            Self::ReadProperty(s) => Some(s.property_id),
            Self::SubscribeCov(_) => None,
            Self::WriteProperty(s) => Some(s.property_id),
        }
    }
}

/// Services carried by an UnconfirmedRequest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnconfirmedService {
    IAm(IAmRequest),
    WhoIs(WhoIsRequest),
    CovNotification(CovNotificationRequest),
}

impl UnconfirmedService {
    pub const fn choice(&self) -> u8 {
        match self {
            Self::IAm(_) => SERVICE_I_AM,
            Self::WhoIs(_) => SERVICE_WHO_IS,
            Self::CovNotification(_) => SERVICE_UNCONFIRMED_COV_NOTIFICATION,
        }
    }

    pub fn decode(choice: u8, r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match choice {
            SERVICE_I_AM => IAmRequest::decode(r).map(Self::IAm),
            SERVICE_WHO_IS => WhoIsRequest::decode(r).map(Self::WhoIs),
            SERVICE_UNCONFIRMED_COV_NOTIFICATION => {
                CovNotificationRequest::decode(r).map(Self::CovNotification)
            }
            other => Err(reject_choice(other, &KNOWN_UNCONFIRMED)),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::IAm(s) => s.encode(w),
            Self::WhoIs(s) => s.encode(w),
            Self::CovNotification(s) => s.encode(w),
        }
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::IAm(s) => Some(s.device_id),
            Self::WhoIs(_) => None,
            Self::CovNotification(s) => Some(s.monitored_object_id),
        }
    }
}

/// Confirmed services whose acknowledgement is a bodiless SimpleACK.
pub fn check_simple_ack_choice(choice: u8) -> Result<u8, DecodeError> {
    match choice {
        SERVICE_SUBSCRIBE_COV | SERVICE_WRITE_PROPERTY => Ok(choice),
        other => Err(reject_choice(other, &KNOWN_CONFIRMED)),
    }
}

/// Services answered with a ComplexACK.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComplexAckService {
    ReadProperty(ReadPropertyAck),
}

impl ComplexAckService {
    pub const fn choice(&self) -> u8 {
        match self {
            Self::ReadProperty(_) => SERVICE_READ_PROPERTY,
        }
    }

    pub fn decode(choice: u8, r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        match choice {
            SERVICE_READ_PROPERTY => ReadPropertyAck::decode(r).map(Self::ReadProperty),
            other => Err(reject_choice(other, &KNOWN_CONFIRMED)),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::ReadProperty(s) => s.encode(w),
        }
    }
}

pub(crate) fn read_object_id(r: &mut Reader<'_>, tag_num: u8) -> Result<ObjectId, DecodeError> {
    ObjectIdentifier::read_param(r, tag_num).map(|o| o.value())
}

pub(crate) fn read_property_id(
    r: &mut Reader<'_>,
    tag_num: u8,
) -> Result<PropertyId, DecodeError> {
    Unsigned::read_param(r, tag_num).map(|p| PropertyId::from_u32(p.value()))
}

/// Reads a context parameter when the next tag announces it. End of input
/// or any other tag yields `None` without consuming anything.
pub(crate) fn read_optional_param<P: Primitive>(
    r: &mut Reader<'_>,
    tag_num: u8,
) -> Result<Option<P>, DecodeError> {
    if r.is_empty() || !Tag::peek(r)?.is_context(tag_num) {
        return Ok(None);
    }
    P::read_param(r, tag_num).map(Some)
}

#[cfg(test)]
mod tests {
    use super::{
        check_simple_ack_choice, ConfirmedService, UnconfirmedService,
        SERVICE_READ_PROPERTY_MULTIPLE, SERVICE_WHO_HAS,
    };
    use crate::encoding::reader::Reader;
    use crate::DecodeError;

    #[test]
    fn known_but_unimplemented_choices_are_unsupported() {
        let mut r = Reader::new(&[]);
        assert_eq!(
            ConfirmedService::decode(SERVICE_READ_PROPERTY_MULTIPLE, &mut r).unwrap_err(),
            DecodeError::Unsupported
        );
        assert_eq!(
            UnconfirmedService::decode(SERVICE_WHO_HAS, &mut r).unwrap_err(),
            DecodeError::Unsupported
        );
    }

    #[test]
    fn foreign_choices_are_unknown() {
        let mut r = Reader::new(&[]);
        assert_eq!(
            ConfirmedService::decode(0x1F, &mut r).unwrap_err(),
            DecodeError::UnknownServiceChoice(0x1F)
        );
        assert_eq!(
            UnconfirmedService::decode(0x20, &mut r).unwrap_err(),
            DecodeError::UnknownServiceChoice(0x20)
        );
        assert_eq!(
            check_simple_ack_choice(0x0C).unwrap_err(),
            DecodeError::Unsupported
        );
        assert_eq!(check_simple_ack_choice(0x0F), Ok(0x0F));
    }
}
