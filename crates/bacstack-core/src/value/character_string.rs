use super::{eq_by_value, Primitive};
use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag, TagClass, EXTENDED_LENGTH},
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

/// ANSI X3.4 / UTF-8, the only character set this stack speaks.
pub const CHARSET_UTF8: u8 = 0;

/// A character string, always written with an extended length byte and a
/// leading charset byte.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterString {
    value: String,
    tag: Tag,
}

impl CharacterString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: Tag::application(AppTag::CharacterString, EXTENDED_LENGTH),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl Primitive for CharacterString {
    const APP_TAG: AppTag = AppTag::CharacterString;
    type Value = String;

    fn value(&self) -> String {
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
        if r.read_u8()? != CHARSET_UTF8 {
            return Err(DecodeError::Unsupported);
        }
        let value = r.read_string(len - 1)?;
        Ok(Self {
            value: value.to_owned(),
            tag,
        })
    }

    fn data_len(&self) -> usize {
        1 + self.value.len()
    }

    fn encode_data(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(CHARSET_UTF8)?;
        w.write_all(self.value.as_bytes())
    }

    fn write_value(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        Tag::encode_extended(
            w,
            Self::APP_TAG as u8,
            TagClass::Application,
            self.data_len(),
        )?;
        self.encode_data(w)
    }

    fn write_param(&self, w: &mut Writer<'_>, tag_num: u8) -> Result<(), EncodeError> {
        Tag::encode_extended(w, tag_num, TagClass::Context, self.data_len())?;
        self.encode_data(w)
    }
}

eq_by_value!(CharacterString);
