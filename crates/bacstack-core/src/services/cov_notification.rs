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

pub const SERVICE_UNCONFIRMED_COV_NOTIFICATION: u8 = 0x02;

/// One entry of the notification's list of values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovPropertyValue {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: Vec<Value>,
    pub priority: Option<u8>,
}

impl CovPropertyValue {
    pub fn new(property_id: PropertyId, value: Value) -> Self {
        Self {
            property_id,
            array_index: None,
            values: vec![value],
            priority: None,
        }
    }

    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Unsigned::new(self.property_id.to_u32()).write_param(w, 0)?;
        if let Some(idx) = self.array_index {
            Unsigned::new(idx).write_param(w, 1)?;
        }
        encode_value_list(w, 2, &self.values)?;
        if let Some(p) = self.priority {
            Unsigned::new(p as u32).write_param(w, 3)?;
        }
        Ok(())
    }

    fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let property_id = read_property_id(r, 0)?;
        let array_index = read_optional_param::<Unsigned>(r, 1)?.map(|i| i.value());
        expect_tag(r, Tag::opening(2))?;
        let values = decode_value_list(r, 2)?;
        let priority = read_optional_param::<Unsigned>(r, 3)?
            .map(|p| u8::try_from(p.value()).map_err(|_| DecodeError::InvalidValue))
            .transpose()?;
        Ok(Self {
            property_id,
            array_index,
            values,
            priority,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovNotificationRequest {
    pub subscriber_process_id: u32,
    pub initiating_device_id: ObjectId,
    pub monitored_object_id: ObjectId,
    pub time_remaining_seconds: u32,
    pub values: Vec<CovPropertyValue>,
}

impl CovNotificationRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Unsigned::new(self.subscriber_process_id).write_param(w, 0)?;
        ObjectIdentifier::from(self.initiating_device_id).write_param(w, 1)?;
        ObjectIdentifier::from(self.monitored_object_id).write_param(w, 2)?;
        Unsigned::new(self.time_remaining_seconds).write_param(w, 3)?;
        Tag::opening(4).encode(w)?;
        for value in &self.values {
            value.encode(w)?;
        }
        Tag::closing(4).encode(w)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let subscriber_process_id = Unsigned::read_param(r, 0)?.value();
        let initiating_device_id = read_object_id(r, 1)?;
        let monitored_object_id = read_object_id(r, 2)?;
        let time_remaining_seconds = Unsigned::read_param(r, 3)?.value();

        expect_tag(r, Tag::opening(4))?;
        let mut values = Vec::new();
        while Tag::peek(r)? != Tag::closing(4) {
            values.push(CovPropertyValue::decode(r)?);
        }
        Tag::decode(r)?;

        Ok(Self {
            subscriber_process_id,
            initiating_device_id,
            monitored_object_id,
            time_remaining_seconds,
            values,
        })
    }

    /// First value reported for `property`, if any.
    pub fn value_of(&self, property: PropertyId) -> Option<&Value> {
        self.values
            .iter()
            .find(|v| v.property_id == property)
            .and_then(|v| v.values.first())
    }
}
