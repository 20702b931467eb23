use crate::encoding::{reader::Reader, writer::Writer};
use crate::services::read_optional_param;
use crate::value::{Primitive, Unsigned};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WHO_IS: u8 = 0x08;

/// Who-Is, optionally limited to a device-instance range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhoIsRequest {
    pub low_limit: Option<u32>,
    pub high_limit: Option<u32>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self {
            low_limit: None,
            high_limit: None,
        }
    }

    pub const fn range(low: u32, high: u32) -> Self {
        Self {
            low_limit: Some(low),
            high_limit: Some(high),
        }
    }

    /// True when a device with `instance` should answer.
    pub fn matches(&self, instance: u32) -> bool {
        match (self.low_limit, self.high_limit) {
            (Some(low), Some(high)) => (low..=high).contains(&instance),
            _ => true,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match (self.low_limit, self.high_limit) {
            (None, None) => Ok(()),
            (Some(low), Some(high)) => {
                Unsigned::new(low).write_param(w, 0)?;
                Unsigned::new(high).write_param(w, 1)
            }
            _ => Err(EncodeError::Message("who-is limits must be given together")),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let low_limit = read_optional_param::<Unsigned>(r, 0)?.map(|v| v.value());
        let high_limit = read_optional_param::<Unsigned>(r, 1)?.map(|v| v.value());
        if low_limit.is_some() != high_limit.is_some() {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            low_limit,
            high_limit,
        })
    }
}
