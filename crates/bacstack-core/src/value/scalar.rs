use super::{app_tag_for, eq_by_value, fixed_len, Primitive};
use crate::encoding::{
    primitives::{decode_unsigned, encode_unsigned, unsigned_width},
    reader::Reader,
    tag::{AppTag, Tag, TagClass},
    writer::Writer,
};
use crate::{DecodeError, EncodeError, ValueError};

/// Rounds to four decimal digits. Applied to every `Real` on read and on set.
///
/// Ties go toward positive infinity, so `-0.03125` becomes `-0.0312`.
pub fn round_real(v: f32) -> f32 {
    ((v as f64 * 1e4 + 0.5).floor() / 1e4) as f32
}

fn whole_number(v: f64, what: &'static str) -> Result<u32, ValueError> {
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return Err(ValueError::InvalidDomain(what));
    }
    Ok(v as u32)
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Null {
    value: (),
    tag: Tag,
}

impl Null {
    pub const fn new() -> Self {
        Self {
            value: (),
            tag: Tag::application(AppTag::Null, 0),
        }
    }
}

impl Default for Null {
    fn default() -> Self {
        Self::new()
    }
}

impl Primitive for Null {
    const APP_TAG: AppTag = AppTag::Null;
    type Value = ();

    fn value(&self) -> Self::Value {
        self.value
    }

    fn tag(&self) -> Tag {
        self.tag
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        fixed_len(r, tag, 0)?;
        Ok(Self { value: (), tag })
    }

    fn data_len(&self) -> usize {
        0
    }

    fn encode_data(&self, _w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Ok(())
    }
}

/// Application booleans live in the tag's value field; context booleans carry
/// one data byte.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boolean {
    value: bool,
    tag: Tag,
}

impl Boolean {
    pub const fn new(value: bool) -> Self {
        Self {
            value,
            tag: Tag::application(AppTag::Boolean, value as u8),
        }
    }

    pub fn set_value(&mut self, value: bool) {
        *self = Self::new(value);
    }
}

impl Primitive for Boolean {
    const APP_TAG: AppTag = AppTag::Boolean;
    type Value = bool;

    fn value(&self) -> bool {
        self.value
    }

    fn tag(&self) -> Tag {
        self.tag
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        let raw = match tag.class {
            TagClass::Application => tag.value,
            TagClass::Context => {
                fixed_len(r, tag, 1)?;
                r.read_u8()?
            }
        };
        match raw {
            0 | 1 => Ok(Self {
                value: raw == 1,
                tag,
            }),
            _ => Err(DecodeError::InvalidValue),
        }
    }

    fn data_len(&self) -> usize {
        1
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(self.value as u8)
    }

    fn write_value(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Tag::application(AppTag::Boolean, self.value as u8).encode(w)
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unsigned {
    value: u32,
    tag: Tag,
}

impl Unsigned {
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            tag: app_tag_for(AppTag::UnsignedInt, unsigned_width(value)),
        }
    }

    /// Accepts only finite, non-negative whole numbers that fit in 32 bits.
    pub fn from_f64(value: f64) -> Result<Self, ValueError> {
        whole_number(value, "unsigned integer must be a finite whole number").map(Self::new)
    }

    pub fn set_value(&mut self, value: u32) {
        *self = Self::new(value);
    }
}

impl Primitive for Unsigned {
    const APP_TAG: AppTag = AppTag::UnsignedInt;
    type Value = u32;

    fn value(&self) -> u32 {
        self.value
    }

    fn tag(&self) -> Tag {
        self.tag
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        let len = tag.data_len(r)?;
        Ok(Self {
            value: decode_unsigned(r, len)?,
            tag,
        })
    }

    fn data_len(&self) -> usize {
        unsigned_width(self.value)
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_unsigned(w, self.value).map(|_| ())
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enumerated {
    value: u32,
    tag: Tag,
}

impl Enumerated {
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            tag: app_tag_for(AppTag::Enumerated, unsigned_width(value)),
        }
    }

    pub fn from_f64(value: f64) -> Result<Self, ValueError> {
        whole_number(value, "enumerated must be a finite whole number").map(Self::new)
    }

    pub fn set_value(&mut self, value: u32) {
        *self = Self::new(value);
    }
}

impl Primitive for Enumerated {
    const APP_TAG: AppTag = AppTag::Enumerated;
    type Value = u32;

    fn value(&self) -> u32 {
        self.value
    }

    fn tag(&self) -> Tag {
        self.tag
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        let len = tag.data_len(r)?;
        Ok(Self {
            value: decode_unsigned(r, len)?,
            tag,
        })
    }

    fn data_len(&self) -> usize {
        unsigned_width(self.value)
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_unsigned(w, self.value).map(|_| ())
    }
}

/// IEEE-754 single precision, normalised to four decimal digits.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Real {
    value: f32,
    tag: Tag,
}

impl Real {
    pub fn new(value: f32) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::InvalidDomain("real must be finite"));
        }
        Ok(Self {
            value: round_real(value),
            tag: Tag::application(AppTag::Real, 4),
        })
    }

    pub fn set_value(&mut self, value: f32) -> Result<(), ValueError> {
        *self = Self::new(value)?;
        Ok(())
    }
}

impl Primitive for Real {
    const APP_TAG: AppTag = AppTag::Real;
    type Value = f32;

    fn value(&self) -> f32 {
        self.value
    }

    fn tag(&self) -> Tag {
        self.tag
    }

    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError> {
        fixed_len(r, tag, 4)?;
        Ok(Self {
            value: round_real(r.read_be_f32()?),
            tag,
        })
    }

    fn data_len(&self) -> usize {
        4
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_be_f32(self.value)
    }
}

eq_by_value!(Null, Boolean, Unsigned, Enumerated, Real);
