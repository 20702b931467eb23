use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Smallest of the 1, 2 or 4 byte widths that holds `value`.
pub const fn unsigned_width(value: u32) -> usize {
    if value <= 0xFF {
        1
    } else if value <= 0xFFFF {
        2
    } else {
        4
    }
}

pub fn encode_unsigned(w: &mut Writer<'_>, value: u32) -> Result<usize, EncodeError> {
    let len = unsigned_width(value);
    w.write_all(&value.to_be_bytes()[4 - len..])?;
    Ok(len)
}

pub fn decode_unsigned(r: &mut Reader<'_>, len: usize) -> Result<u32, DecodeError> {
    if len == 0 || len > 4 {
        return Err(DecodeError::InvalidLength);
    }
    let mut value = 0u32;
    for b in r.read_exact(len)? {
        value = (value << 8) | *b as u32;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{decode_unsigned, encode_unsigned, unsigned_width};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::DecodeError;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unsigned_roundtrip(v in any::<u32>()) {
            let mut b = [0u8; 8];
            let mut w = Writer::new(&mut b);
            let len = encode_unsigned(&mut w, v).unwrap();
            prop_assert!(len == 1 || len == 2 || len == 4);
            let mut r = Reader::new(w.as_written());
            let got = decode_unsigned(&mut r, len).unwrap();
            prop_assert_eq!(got, v);
        }
    }

    #[test]
    fn width_skips_three_bytes() {
        assert_eq!(unsigned_width(0), 1);
        assert_eq!(unsigned_width(0x100), 2);
        assert_eq!(unsigned_width(0x1_0000), 4);
        assert_eq!(unsigned_width(u32::MAX), 4);
    }

    #[test]
    fn three_byte_values_still_decode() {
        let mut r = Reader::new(&[0x01, 0x02, 0x03]);
        assert_eq!(decode_unsigned(&mut r, 3).unwrap(), 0x010203);
    }

    #[test]
    fn zero_or_oversized_width_is_rejected() {
        let mut r = Reader::new(&[0; 8]);
        assert_eq!(decode_unsigned(&mut r, 0).unwrap_err(), DecodeError::InvalidLength);
        assert_eq!(decode_unsigned(&mut r, 5).unwrap_err(), DecodeError::InvalidLength);
    }
}
