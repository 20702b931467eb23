use crate::encoding::{
    reader::Reader,
    tag::{expect_tag, Tag},
    writer::Writer,
};
use crate::services::{read_object_id, read_optional_param, read_property_id};
use crate::types::{ObjectId, PropertyId};
use crate::value::{
    decode_value_list, encode_value_list, ObjectIdentifier, Primitive, Unsigned, Value,
};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl ReadPropertyRequest {
    pub const fn new(object_id: ObjectId, property_id: PropertyId) -> Self {
        Self {
            object_id,
            property_id,
            array_index: None,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ObjectIdentifier::from(self.object_id).write_param(w, 0)?;
        Unsigned::new(self.property_id.to_u32()).write_param(w, 1)?;
        if let Some(idx) = self.array_index {
            Unsigned::new(idx).write_param(w, 2)?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = read_object_id(r, 0)?;
        let property_id = read_property_id(r, 1)?;
        let array_index = r.optional(|r| Unsigned::read_param(r, 2)).map(|i| i.value());
        Ok(Self {
            object_id,
            property_id,
            array_index,
        })
    }
}

/// ComplexACK body answering a [`ReadPropertyRequest`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyAck {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: Vec<Value>,
}

impl ReadPropertyAck {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ReadPropertyRequest {
            object_id: self.object_id,
            property_id: self.property_id,
            array_index: self.array_index,
        }
        .encode(w)?;
        encode_value_list(w, 3, &self.values)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let object_id = read_object_id(r, 0)?;
        let property_id = read_property_id(r, 1)?;
        let array_index = read_optional_param::<Unsigned>(r, 2)?.map(|i| i.value());
        expect_tag(r, Tag::opening(3))?;
        let values = decode_value_list(r, 3)?;
        Ok(Self {
            object_id,
            property_id,
            array_index,
            values,
        })
    }
}
