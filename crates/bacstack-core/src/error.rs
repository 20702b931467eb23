use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    BufferTooSmall,
    ValueOutOfRange,
    InvalidLength,
    Unsupported,
    Message(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("buffer too small"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for EncodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A read would run past the end of the buffer.
    BufferUnderrun,
    /// An application tag number with no codec.
    UnknownTag(u8),
    /// A well-formed tag that is not the one the grammar expects here.
    UnexpectedTag,
    UnknownServiceChoice(u8),
    UnknownPduType(u8),
    InvalidLength,
    InvalidValue,
    Unsupported,
    Message(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferUnderrun => f.write_str("buffer underrun"),
            Self::UnknownTag(n) => write!(f, "unknown application tag {n}"),
            Self::UnexpectedTag => f.write_str("unexpected tag"),
            Self::UnknownServiceChoice(c) => write!(f, "unknown service choice 0x{c:02x}"),
            Self::UnknownPduType(t) => write!(f, "unknown pdu type {t}"),
            Self::InvalidLength => f.write_str("invalid length"),
            Self::InvalidValue => f.write_str("invalid value"),
            Self::Unsupported => f.write_str("operation unsupported"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Raised when a primitive is built or mutated with a value outside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    InvalidDomain(&'static str),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain(what) => write!(f, "invalid domain: {what}"),
        }
    }
}

impl std::error::Error for ValueError {}

/// Framing layer a [`ProtocolError`] was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Bvlc,
    Npdu,
    Apdu,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bvlc => f.write_str("BVLC"),
            Self::Npdu => f.write_str("NPDU"),
            Self::Apdu => f.write_str("APDU"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cause {
    Decode(DecodeError),
    Inner(Box<ProtocolError>),
}

/// A decode failure annotated with every framing layer it passed through.
///
/// Renders as `"BVLC - decode: Parse - NPDU - decode: Parse - buffer underrun"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    layer: Layer,
    cause: Cause,
}

impl ProtocolError {
    pub fn decode(layer: Layer, err: DecodeError) -> Self {
        Self {
            layer,
            cause: Cause::Decode(err),
        }
    }

    pub fn wrap(layer: Layer, inner: ProtocolError) -> Self {
        Self {
            layer,
            cause: Cause::Inner(Box::new(inner)),
        }
    }

    /// Outermost layer that reported the failure.
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Innermost layer, where the failing read happened.
    pub fn origin(&self) -> Layer {
        match &self.cause {
            Cause::Decode(_) => self.layer,
            Cause::Inner(inner) => inner.origin(),
        }
    }

    pub fn root_cause(&self) -> DecodeError {
        match &self.cause {
            Cause::Decode(err) => *err,
            Cause::Inner(inner) => inner.root_cause(),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - decode: Parse - ", self.layer)?;
        match &self.cause {
            Cause::Decode(err) => write!(f, "{err}"),
            Cause::Inner(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::Decode(err) => Some(err),
            Cause::Inner(inner) => Some(inner.as_ref()),
        }
    }
}
