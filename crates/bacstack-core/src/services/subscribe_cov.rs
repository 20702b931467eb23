use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::{read_object_id, read_optional_param};
use crate::types::ObjectId;
use crate::value::{Boolean, ObjectIdentifier, Primitive, Unsigned};
use crate::{DecodeError, EncodeError};

pub const SERVICE_SUBSCRIBE_COV: u8 = 0x05;

/// SubscribeCOV request. Leaving out both the confirmation flag and the
/// lifetime turns it into a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovRequest {
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    pub issue_confirmed_notifications: Option<bool>,
    pub lifetime_seconds: Option<u32>,
}

impl SubscribeCovRequest {
    pub const fn new(
        subscriber_process_id: u32,
        monitored_object_id: ObjectId,
        issue_confirmed_notifications: bool,
        lifetime_seconds: u32,
    ) -> Self {
        Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications: Some(issue_confirmed_notifications),
            lifetime_seconds: Some(lifetime_seconds),
        }
    }

    pub const fn cancel(subscriber_process_id: u32, monitored_object_id: ObjectId) -> Self {
        Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications: None,
            lifetime_seconds: None,
        }
    }

    pub const fn is_cancellation(&self) -> bool {
        self.issue_confirmed_notifications.is_none() && self.lifetime_seconds.is_none()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Unsigned::new(self.subscriber_process_id).write_param(w, 0)?;
        ObjectIdentifier::from(self.monitored_object_id).write_param(w, 1)?;
        if let Some(confirmed) = self.issue_confirmed_notifications {
            Boolean::new(confirmed).write_param(w, 2)?;
        }
        if let Some(lifetime) = self.lifetime_seconds {
            Unsigned::new(lifetime).write_param(w, 3)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let subscriber_process_id = Unsigned::read_param(r, 0)?.value();
        let monitored_object_id = read_object_id(r, 1)?;
        let issue_confirmed_notifications =
            read_optional_param::<Boolean>(r, 2)?.map(|b| b.value());
        let lifetime_seconds = read_optional_param::<Unsigned>(r, 3)?.map(|l| l.value());
        Ok(Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications,
            lifetime_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SubscribeCovRequest;
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{ObjectId, ObjectType};

    fn roundtrip(req: SubscribeCovRequest) -> (Vec<u8>, SubscribeCovRequest) {
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        let bytes = w.as_written().to_vec();
        let mut r = Reader::new(&bytes);
        let got = SubscribeCovRequest::decode(&mut r).unwrap();
        assert!(r.is_empty());
        (bytes, got)
    }

    #[test]
    fn subscription_roundtrip() {
        let req = SubscribeCovRequest::new(
            7,
            ObjectId::new(ObjectType::AnalogInput, 2).unwrap(),
            false,
            600,
        );
        let (bytes, got) = roundtrip(req);
        assert_eq!(got, req);
        assert_eq!(&bytes[..2], &[0x09, 0x07]);
        assert_eq!(&bytes[7..9], &[0x29, 0x00]);
        assert!(!got.is_cancellation());
    }

    #[test]
    fn cancellation_has_no_optional_fields() {
        let object_id = ObjectId::new(ObjectType::AnalogInput, 2).unwrap();
        let req = SubscribeCovRequest::cancel(7, object_id);
        let (bytes, got) = roundtrip(req);
        assert_eq!(bytes.len(), 7);
        assert!(got.is_cancellation());
    }
}
