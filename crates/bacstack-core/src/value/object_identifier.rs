use super::{eq_by_value, fixed_len, Primitive};
use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError, ValueError};

/// Four-byte object identifier: 10-bit type, 22-bit instance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectIdentifier {
    value: ObjectId,
    tag: Tag,
}

impl ObjectIdentifier {
    pub fn new(object_type: u16, instance: u32) -> Result<Self, ValueError> {
        ObjectId::from_parts(object_type, instance).map(Self::from)
    }

    pub fn set_value(&mut self, value: ObjectId) {
        self.value = value;
    }
}

impl From<ObjectId> for ObjectIdentifier {
    fn from(value: ObjectId) -> Self {
        Self {
            value,
            tag: Tag::application(AppTag::ObjectId, 4),
        }
    }
}

impl Primitive for ObjectIdentifier {
    const APP_TAG: AppTag = AppTag::ObjectId;
    type Value = ObjectId;

    fn value(&self) -> ObjectId {
        self.value
    }

    fn tag(&self) -> Tag {
        self.tag
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        fixed_len(r, tag, 4)?;
        Ok(Self {
            value: ObjectId::from_raw(r.read_be_u32()?),
            tag,
        })
    }

    fn data_len(&self) -> usize {
        4
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_be_u32(self.value.raw())
    }
}

eq_by_value!(ObjectIdentifier);

#[cfg(test)]
mod tests {
    use super::ObjectIdentifier;
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::ObjectType;
    use crate::value::Primitive;
    use crate::DecodeError;

    fn encoded(id: &ObjectIdentifier) -> Vec<u8> {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        id.write_value(&mut w).unwrap();
        w.as_written().to_vec()
    }

    #[test]
    fn device_9999_wire_bytes() {
        let id = ObjectIdentifier::new(8, 9999).unwrap();
        assert_eq!(encoded(&id), vec![0xC4, 0x02, 0x00, 0x27, 0x0F]);
    }

    #[test]
    fn analog_value_46_wire_bytes() {
        let id = ObjectIdentifier::new(5, 46).unwrap();
        assert_eq!(encoded(&id), vec![0xC4, 0x01, 0x40, 0x00, 0x2E]);

        let got = ObjectIdentifier::read_value(&mut Reader::new(&encoded(&id))).unwrap();
        assert_eq!(got.value().object_type(), ObjectType::BinaryValue);
        assert_eq!(got.value().instance(), 46);
    }

    #[test]
    fn context_form_and_bad_length() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        ObjectIdentifier::new(8, 9999)
            .unwrap()
            .write_param(&mut w, 0)
            .unwrap();
        assert_eq!(w.as_written(), &[0x0C, 0x02, 0x00, 0x27, 0x0F]);

        let err = ObjectIdentifier::read_value(&mut Reader::new(&[0xC3, 0, 0, 0])).unwrap_err();
        assert_eq!(err, DecodeError::InvalidLength);
    }

    #[test]
    fn out_of_domain_parts_are_rejected() {
        assert!(ObjectIdentifier::new(0x400, 1).is_err());
        assert!(ObjectIdentifier::new(8, 0x40_0000).is_err());
    }
}
