//! Application primitive values.
//!
//! Every primitive reads and writes its own tag immediately before its data
//! bytes, either as a bare application-tagged value ([`Primitive::write_value`])
//! or as a context-tagged service parameter ([`Primitive::write_param`]).
//! [`Value`] is the tagged union the service decoders hand back; it picks the
//! codec from the application tag number.

mod bit_string;
mod character_string;
mod object_identifier;
mod scalar;

pub use bit_string::{BitString, StatusFlags};
pub use character_string::CharacterString;
pub use object_identifier::ObjectIdentifier;
pub use scalar::{round_real, Boolean, Enumerated, Null, Real, Unsigned};

use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag, TagClass, EXTENDED_LENGTH},
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError, ValueError};

/// Codec shared by every application primitive.
pub trait Primitive: Sized {
    const APP_TAG: AppTag;
    type Value;

    fn value(&self) -> Self::Value;

    /// Tag last read for this value, or the one it will be written with.
    fn tag(&self) -> Tag;

    /// Decodes the data bytes following an already consumed `tag`.
    fn decode_data(r: &mut Reader<'_>, tag: Tag) -> Result<Self, DecodeError>;

    /// Number of data bytes announced by the tag.
    fn data_len(&self) -> usize;

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError>;

    fn read_value(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let tag = Tag::decode(r)?;
        if tag.class != TagClass::Application || tag.number != Self::APP_TAG as u8 {
            return Err(DecodeError::UnexpectedTag);
        }
        Self::decode_data(r, tag)
    }

    fn read_param(r: &mut Reader<'_>, tag_num: u8) -> Result<Self, DecodeError> {
        let tag = Tag::decode(r)?;
        if !tag.is_context(tag_num) {
            return Err(DecodeError::UnexpectedTag);
        }
        Self::decode_data(r, tag)
    }

    fn write_value(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Tag::encode_with_len(
            w,
            Self::APP_TAG as u8,
            TagClass::Application,
            self.data_len(),
        )?;
        self.encode_data(w)
    }

    fn write_param(&self, w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
        Tag::encode_with_len(w, tag_num, TagClass::Context, self.data_len())?;
        self.encode_data(w)
    }
}

pub(crate) const fn app_tag_for(tag: AppTag, len: usize) -> Tag {
    Tag::application(tag, if len <= 4 { len as u8 } else { EXTENDED_LENGTH })
}

/// Reads the data length for `tag` and checks it equals `expected`.
pub(crate) fn fixed_len(r: &mut Reader<'_>, tag: Tag, expected: usize) -> Result<(), DecodeError> {
    if tag.data_len(r)? != expected {
        return Err(DecodeError::InvalidLength);
    }
    Ok(())
}

/// Primitives compare by value; the remembered tag is diagnostics only.
macro_rules! eq_by_value {
    ($($ty:ty),*) => {
        $(impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.value == other.value
            }
        })*
    };
}
pub(crate) use eq_by_value;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Null(Null),
    Boolean(Boolean),
    Unsigned(Unsigned),
    Real(Real),
    CharacterString(CharacterString),
    BitString(BitString),
    StatusFlags(StatusFlags),
    Enumerated(Enumerated),
    ObjectId(ObjectIdentifier),
}

impl Value {
    pub fn null() -> Self {
        Self::Null(Null::new())
    }

    pub fn boolean(v: bool) -> Self {
        Self::Boolean(Boolean::new(v))
    }

    pub fn unsigned(v: u32) -> Self {
        Self::Unsigned(Unsigned::new(v))
    }

    pub fn real(v: f32) -> Result<Self, ValueError> {
        Real::new(v).map(Self::Real)
    }

    pub fn character_string(v: impl Into<String>) -> Self {
        Self::CharacterString(CharacterString::new(v))
    }

    pub fn enumerated(v: u32) -> Self {
        Self::Enumerated(Enumerated::new(v))
    }

    pub fn object_id(v: ObjectId) -> Self {
        Self::ObjectId(ObjectIdentifier::from(v))
    }

    pub fn status_flags(v: StatusFlags) -> Self {
        Self::StatusFlags(v)
    }

    /// Decodes the next application-tagged value, choosing the codec from a
    /// non-consuming look at its tag.
    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let tag = Tag::peek(r)?;
        Self::decode_by_tag(tag, r)
    }

    /// Dispatches on `tag`, which must be the (unconsumed) next tag in `r`.
    pub fn decode_by_tag(tag: Tag, r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if tag.class != TagClass::Application {
            return Err(DecodeError::UnexpectedTag);
        }
        match AppTag::from_u8(tag.number)? {
            AppTag::Null => Null::read_value(r).map(Self::Null),
            AppTag::Boolean => Boolean::read_value(r).map(Self::Boolean),
            AppTag::UnsignedInt => Unsigned::read_value(r).map(Self::Unsigned),
            AppTag::Real => Real::read_value(r).map(Self::Real),
            AppTag::CharacterString => CharacterString::read_value(r).map(Self::CharacterString),
            AppTag::BitString => {
                if StatusFlags::is_next(r) {
                    StatusFlags::read_value(r).map(Self::StatusFlags)
                } else {
                    BitString::read_value(r).map(Self::BitString)
                }
            }
            AppTag::Enumerated => Enumerated::read_value(r).map(Self::Enumerated),
            AppTag::ObjectId => ObjectIdentifier::read_value(r).map(Self::ObjectId),
            other => Err(DecodeError::UnknownTag(other as u8)),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Null(v) => v.write_value(w),
            Self::Boolean(v) => v.write_value(w),
            Self::Unsigned(v) => v.write_value(w),
            Self::Real(v) => v.write_value(w),
            Self::CharacterString(v) => v.write_value(w),
            Self::BitString(v) => v.write_value(w),
            Self::StatusFlags(v) => v.write_value(w),
            Self::Enumerated(v) => v.write_value(w),
            Self::ObjectId(v) => v.write_value(w),
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::Null(v) => v.tag(),
            Self::Boolean(v) => v.tag(),
            Self::Unsigned(v) => v.tag(),
            Self::Real(v) => v.tag(),
            Self::CharacterString(v) => v.tag(),
            Self::BitString(v) => v.tag(),
            Self::StatusFlags(v) => v.tag(),
            Self::Enumerated(v) => v.tag(),
            Self::ObjectId(v) => v.tag(),
        }
    }

    pub fn as_real(&self) -> Option<f32> {
        match self {
            Self::Real(v) => Some(v.value()),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u32> {
        match self {
            Self::Unsigned(v) => Some(v.value()),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ObjectId(v) => Some(v.value()),
            _ => None,
        }
    }
}

/// Decodes application values up to (and consuming) the closing tag `tag_num`.
pub fn decode_value_list(r: &mut Reader<'_>, tag_num: u8) -> Result<Vec<Value>, DecodeError> {
    let mut values = Vec::new();
    loop {
        let next = Tag::peek(r)?;
        if next == Tag::closing(tag_num) {
            Tag::decode(r)?;
            return Ok(values);
        }
        values.push(Value::decode_by_tag(next, r)?);
    }
}

/// Writes `values` bracketed by opening/closing tag `tag_num`.
pub fn encode_value_list(
    w: &mut Writer<'_>,
    tag_num: u8,
    values: &[Value],
) -> Result<(), EncodeError> {
    Tag::opening(tag_num).encode(w)?;
    for value in values {
        value.encode(w)?;
    }
    Tag::closing(tag_num).encode(w)
}
