use crate::encoding::{reader::Reader, tag::Tag, writer::Writer};
use crate::services::{read_object_id, read_optional_param, read_property_id};
use crate::types::{ObjectId, PropertyId};
use crate::value::{
    decode_value_list, encode_value_list, ObjectIdentifier, Primitive, Unsigned, Value,
};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WRITE_PROPERTY: u8 = 0x0F;

/// Lowest and highest command priority.
pub const PRIORITY_RANGE: std::ops::RangeInclusive<u8> = 1..=16;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WritePropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: Vec<Value>,
    pub priority: Option<u8>,
}

impl WritePropertyRequest {
    pub fn new(object_id: ObjectId, property_id: PropertyId, value: Value) -> Self {
        Self {
            object_id,
            property_id,
            array_index: None,
            values: vec![value],
            priority: None,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ObjectIdentifier::from(self.object_id).write_param(w, 0)?;
        Unsigned::new(self.property_id.to_u32()).write_param(w, 1)?;
        if let Some(idx) = self.array_index {
            Unsigned::new(idx).write_param(w, 2)?;
        }
        encode_value_list(w, 3, &self.values)?;
        if let Some(priority) = self.priority {
            if !PRIORITY_RANGE.contains(&priority) {
                return Err(EncodeError::ValueOutOfRange);
            }
            Unsigned::new(priority as u32).write_param(w, 4)?;
        }
        Ok(())
    }

    /// After the property id the next tag is either the array index (context
    /// 2) or the opening tag 3 of the value list. Anything else is rejected.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = read_object_id(r, 0)?;
        let property_id = read_property_id(r, 1)?;

        let next = Tag::peek(r)?;
        let array_index = if next.is_context(2) {
            Some(Unsigned::read_param(r, 2)?.value())
        } else if next == Tag::opening(3) {
            None
        } else {
            return Err(DecodeError::UnexpectedTag);
        };

        if Tag::decode(r)? != Tag::opening(3) {
            return Err(DecodeError::UnexpectedTag);
        }
        let values = decode_value_list(r, 3)?;

        let priority = match read_optional_param::<Unsigned>(r, 4)? {
            Some(p) => {
                let p = u8::try_from(p.value()).map_err(|_| DecodeError::InvalidValue)?;
                if !PRIORITY_RANGE.contains(&p) {
                    return Err(DecodeError::InvalidValue);
                }
                Some(p)
            }
            None => None,
        };

        Ok(Self {
            object_id,
            property_id,
            array_index,
            values,
            priority,
        })
    }
}
