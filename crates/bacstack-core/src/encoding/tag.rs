use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Length/value code announcing an extended length after the tag byte.
pub const EXTENDED_LENGTH: u8 = 5;
pub const OPENING_TAG_VALUE: u8 = 6;
pub const CLOSING_TAG_VALUE: u8 = 7;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Null),
            1 => Ok(Self::Boolean),
            2 => Ok(Self::UnsignedInt),
            3 => Ok(Self::SignedInt),
            4 => Ok(Self::Real),
            5 => Ok(Self::Double),
            6 => Ok(Self::OctetString),
            7 => Ok(Self::CharacterString),
            8 => Ok(Self::BitString),
            9 => Ok(Self::Enumerated),
            10 => Ok(Self::Date),
            11 => Ok(Self::Time),
            12 => Ok(Self::ObjectId),
            n => Err(DecodeError::UnknownTag(n)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagClass {
    Application,
    Context,
}

/// One BACnet tag byte: `number << 4 | class << 3 | value`.
///
/// `value` is the length of the data that follows, except for application
/// booleans (the boolean itself), opening/closing tags (6/7) and
/// [`EXTENDED_LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    pub number: u8,
    pub class: TagClass,
    pub value: u8,
}

impl Tag {
    pub const fn new(number: u8, class: TagClass, value: u8) -> Self {
        Self {
            number,
            class,
            value,
        }
    }

    pub const fn application(tag: AppTag, value: u8) -> Self {
        Self::new(tag as u8, TagClass::Application, value)
    }

    pub const fn context(number: u8, value: u8) -> Self {
        Self::new(number, TagClass::Context, value)
    }

    pub const fn opening(number: u8) -> Self {
        Self::new(number, TagClass::Context, OPENING_TAG_VALUE)
    }

    pub const fn closing(number: u8) -> Self {
        Self::new(number, TagClass::Context, CLOSING_TAG_VALUE)
    }

    pub const fn from_byte(byte: u8) -> Self {
        Self {
            number: byte >> 4,
            class: if (byte >> 3) & 0x01 == 1 {
                TagClass::Context
            } else {
                TagClass::Application
            },
            value: byte & 0x07,
        }
    }

    pub const fn to_byte(self) -> u8 {
        let class = match self.class {
            TagClass::Application => 0,
            TagClass::Context => 1,
        };
        ((self.number & 0x0f) << 4) | (class << 3) | (self.value & 0x07)
    }

    pub const fn is_opening(&self) -> bool {
        matches!(self.class, TagClass::Context) && self.value == OPENING_TAG_VALUE
    }

    pub const fn is_closing(&self) -> bool {
        matches!(self.class, TagClass::Context) && self.value == CLOSING_TAG_VALUE
    }

    /// True for a primitive (non opening/closing) context tag with this number.
    pub const fn is_context(&self, number: u8) -> bool {
        matches!(self.class, TagClass::Context)
            && self.number == number
            && !self.is_opening()
            && !self.is_closing()
    }

    pub fn app_tag(&self) -> Option<AppTag> {
        match self.class {
            TagClass::Application => AppTag::from_u8(self.number).ok(),
            TagClass::Context => None,
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        r.read_u8().map(Self::from_byte)
    }

    /// Reads the next tag without consuming it.
    pub fn peek(r: &Reader<'_>) -> Result<Self, DecodeError> {
        r.peek_u8().map(Self::from_byte)
    }

    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.number > 0x0f || self.value > 0x07 {
            return Err(EncodeError::ValueOutOfRange);
        }
        w.write_u8(self.to_byte())
    }

    /// Length of the data following this tag, reading the extended length
    /// bytes when `value` is [`EXTENDED_LENGTH`].
    pub fn data_len(self, r: &mut Reader<'_>) -> Result<usize, DecodeError> {
        match self.value {
            0..=4 => Ok(self.value as usize),
            EXTENDED_LENGTH => {
                let v = r.read_u8()?;
                if v <= 253 {
                    Ok(v as usize)
                } else if v == 254 {
                    Ok(r.read_be_u16()? as usize)
                } else {
                    Ok(r.read_be_u32()? as usize)
                }
            }
            _ => Err(DecodeError::InvalidLength),
        }
    }

    /// Writes a tag carrying `len`, in the short form when it fits.
    pub fn encode_with_len(
        w: &mut Writer<'_>,
        number: u8,
        class: TagClass,
        len: usize,
    ) -> Result<(), EncodeError> {
        if len <= 4 {
            Tag::new(number, class, len as u8).encode(w)
        } else {
            Self::encode_extended(w, number, class, len)
        }
    }

    /// Writes a tag with [`EXTENDED_LENGTH`] followed by `len`, whatever its size.
    pub fn encode_extended(
        w: &mut Writer<'_>,
        number: u8,
        class: TagClass,
        len: usize,
    ) -> Result<(), EncodeError> {
        Tag::new(number, class, EXTENDED_LENGTH).encode(w)?;
        if len <= 253 {
            w.write_u8(len as u8)
        } else if len <= 65535 {
            w.write_u8(254)?;
            w.write_be_u16(len as u16)
        } else {
            let len = u32::try_from(len).map_err(|_| EncodeError::InvalidLength)?;
            w.write_u8(255)?;
            w.write_be_u32(len)
        }
    }
}

/// Consumes the next tag and checks it is `expected`.
pub fn expect_tag(r: &mut Reader<'_>, expected: Tag) -> Result<(), DecodeError> {
    if Tag::decode(r)? == expected {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedTag)
    }
}

#[cfg(test)]
mod tests {
    use super::{expect_tag, AppTag, Tag, TagClass};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::DecodeError;

    #[test]
    fn tag_byte_symmetry_for_every_representable_tag() {
        for number in 0..=15u8 {
            for class in [TagClass::Application, TagClass::Context] {
                for value in 0..=7u8 {
                    let tag = Tag::new(number, class, value);
                    let mut buf = [0u8; 1];
                    let mut w = Writer::new(&mut buf);
                    tag.encode(&mut w).unwrap();
                    let mut r = Reader::new(w.as_written());
                    assert_eq!(Tag::decode(&mut r).unwrap(), tag);
                }
            }
        }
    }

    #[test]
    fn splits_byte_into_fields() {
        let tag = Tag::from_byte(0x3E);
        assert_eq!(tag.number, 3);
        assert_eq!(tag.class, TagClass::Context);
        assert_eq!(tag.value, 6);
        assert!(tag.is_opening());
        assert!(!tag.is_closing());
        assert!(Tag::from_byte(0x3F).is_closing());
        // Application tags never open or close a list.
        assert!(!Tag::from_byte(0x36).is_opening());
    }

    #[test]
    fn rejects_unrepresentable_tags() {
        let mut buf = [0u8; 1];
        let mut w = Writer::new(&mut buf);
        assert!(Tag::context(16, 0).encode(&mut w).is_err());
        assert!(Tag::context(1, 8).encode(&mut w).is_err());
    }

    #[test]
    fn extended_length_roundtrip() {
        for len in [5usize, 253, 254, 300, 70_000] {
            let mut buf = [0u8; 8];
            let mut w = Writer::new(&mut buf);
            Tag::encode_with_len(&mut w, AppTag::CharacterString as u8, TagClass::Application, len)
                .unwrap();
            let mut r = Reader::new(w.as_written());
            let tag = Tag::decode(&mut r).unwrap();
            assert_eq!(tag.app_tag(), Some(AppTag::CharacterString));
            assert_eq!(tag.data_len(&mut r).unwrap(), len);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn short_length_stays_in_tag() {
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);
        Tag::encode_with_len(&mut w, 1, TagClass::Context, 2).unwrap();
        assert_eq!(w.as_written(), &[0x1A]);
    }

    #[test]
    fn peek_does_not_consume() {
        let r = Reader::new(&[0x2E]);
        assert!(Tag::peek(&r).unwrap().is_opening());
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn expect_tag_reports_mismatch() {
        let mut r = Reader::new(&[0x3E, 0x4F]);
        expect_tag(&mut r, Tag::opening(3)).unwrap();
        assert_eq!(
            expect_tag(&mut r, Tag::closing(3)).unwrap_err(),
            DecodeError::UnexpectedTag
        );
    }
}
