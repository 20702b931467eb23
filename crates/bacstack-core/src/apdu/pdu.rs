use crate::DecodeError;

/// APDU kind, the top nibble of the first APDU byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ApduType {
    ConfirmedRequest = 0,
    UnconfirmedRequest = 1,
    SimpleAck = 2,
    ComplexAck = 3,
    SegmentAck = 4,
    Error = 5,
    Reject = 6,
    Abort = 7,
}

impl ApduType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::ConfirmedRequest),
            1 => Some(Self::UnconfirmedRequest),
            2 => Some(Self::SimpleAck),
            3 => Some(Self::ComplexAck),
            4 => Some(Self::SegmentAck),
            5 => Some(Self::Error),
            6 => Some(Self::Reject),
            7 => Some(Self::Abort),
            _ => None,
        }
    }

    /// Kind announced by an APDU's first byte.
    pub fn from_meta(meta: u8) -> Option<Self> {
        Self::from_u8(meta >> 4)
    }
}

/// Checks that `meta` carries the expected kind.
pub(crate) fn expect_type(meta: u8, expected: ApduType) -> Result<(), DecodeError> {
    if meta >> 4 == expected as u8 {
        Ok(())
    } else {
        Err(DecodeError::UnknownPduType(meta >> 4))
    }
}
