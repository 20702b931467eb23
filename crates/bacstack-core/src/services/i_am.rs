use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::ObjectId;
use crate::value::{Enumerated, ObjectIdentifier, Primitive, Unsigned};
use crate::{DecodeError, EncodeError};

pub const SERVICE_I_AM: u8 = 0x00;

/// Segmentation support values carried in I-Am.
pub const SEGMENTATION_BOTH: u32 = 0;
pub const SEGMENTATION_NONE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IAmRequest {
    pub device_id: ObjectId,
    pub max_apdu: u32,
    pub segmentation: u32,
    pub vendor_id: u32,
}

impl IAmRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ObjectIdentifier::from(self.device_id).write_value(w)?;
        Unsigned::new(self.max_apdu).write_value(w)?;
        Enumerated::new(self.segmentation).write_value(w)?;
        Unsigned::new(self.vendor_id).write_value(w)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            device_id: ObjectIdentifier::read_value(r)?.value(),
            max_apdu: Unsigned::read_value(r)?.value(),
            segmentation: Enumerated::read_value(r)?.value(),
            vendor_id: Unsigned::read_value(r)?.value(),
        })
    }
}
