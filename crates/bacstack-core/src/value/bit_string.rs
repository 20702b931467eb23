use super::{eq_by_value, fixed_len, Primitive};
use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

/// Arbitrary-length bit string, most significant bit first.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    value: Vec<bool>,
    tag: Tag,
}

impl BitString {
    pub fn new(bits: Vec<bool>) -> Self {
        let len = 1 + bits.len().div_ceil(8);
        Self {
            value: bits,
            tag: super::app_tag_for(AppTag::BitString, len),
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.value
    }

    fn unused_bits(&self) -> u8 {
        ((8 - self.value.len() % 8) % 8) as u8
    }
}

impl Primitive for BitString {
    const APP_TAG: AppTag = AppTag::BitString;
    type Value = Vec<bool>;

    fn value(&self) -> Vec<bool> {
        self.value.clone()
    }

    fn tag(&self) -> Tag {
        self.tag
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        let len = tag.data_len(r)?;
        if len == 0 {
            return Err(DecodeError::InvalidLength);
        }
        let unused = r.read_u8()? as usize;
        let data = r.read_exact(len - 1)?;
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(DecodeError::InvalidValue);
        }
        let total = data.len() * 8 - unused;
        let value = (0..total)
            .map(|i| data[i / 8] & (0x80 >> (i % 8)) != 0)
            .collect();
        Ok(Self { value, tag })
    }

    fn data_len(&self) -> usize {
        1 + self.value.len().div_ceil(8)
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(self.unused_bits())?;
        for chunk in self.value.chunks(8) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, bit)| if *bit { acc | (0x80 >> i) } else { acc });
            w.write_u8(byte)?;
        }
        Ok(())
    }
}

eq_by_value!(BitString);

const STATUS_FLAGS_TAG: Tag = Tag::application(AppTag::BitString, 2);
const STATUS_FLAGS_UNUSED: u8 = 4;

/// The four-bit status flags bit string carried by most object types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFlags {
    pub in_alarm: bool,
    pub fault: bool,
    pub overridden: bool,
    pub out_of_service: bool,
}

impl StatusFlags {
    /// True when the reader sits on a status-flags shaped bit string.
    pub fn is_next(r: &Reader<'_>) -> bool {
        r.rest().starts_with(&[STATUS_FLAGS_TAG.to_byte(), STATUS_FLAGS_UNUSED])
    }

    pub const fn from_bits(byte: u8) -> Self {
        Self {
            in_alarm: byte & 0x80 != 0,
            fault: byte & 0x40 != 0,
            overridden: byte & 0x20 != 0,
            out_of_service: byte & 0x10 != 0,
        }
    }

    pub const fn to_bits(self) -> u8 {
        (self.in_alarm as u8) << 7
            | (self.fault as u8) << 6
            | (self.overridden as u8) << 5
            | (self.out_of_service as u8) << 4
    }
}

impl Primitive for StatusFlags {
    const APP_TAG: AppTag = AppTag::BitString;
    type Value = Self;

    fn value(&self) -> Self {
        *self
    }

    fn tag(&self) -> Tag {
        STATUS_FLAGS_TAG
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        fixed_len(r, tag, 2)?;
        if r.read_u8()? != STATUS_FLAGS_UNUSED {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self::from_bits(r.read_u8()?))
    }

    fn data_len(&self) -> usize {
        2
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(STATUS_FLAGS_UNUSED)?;
        w.write_u8(self.to_bits())
    }
}
