/// Unsigned integer helpers shared by the primitive and service codecs.
pub mod primitives;
/// Read cursor with peek and optional-read modes.
pub mod reader;
/// BACnet tag byte (number, class, length/value) and opening/closing tags.
pub mod tag;
/// Byte writer for encoding BACnet frames into a caller-owned buffer.
pub mod writer;
