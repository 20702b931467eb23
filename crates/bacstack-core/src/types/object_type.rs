macro_rules! object_types {
    ($($variant:ident = $code:literal,)*) => {
        /// BACnet object type identifiers.
        ///
        /// Known standard types are named variants; anything else, including
        /// vendor-specific types (128 and up), is carried as
        /// [`Proprietary`](Self::Proprietary).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum ObjectType {
            $($variant,)*
            Proprietary(u16),
        }

        impl ObjectType {
            /// Converts this object type to its numeric BACnet identifier.
            pub const fn to_u16(self) -> u16 {
                match self {
                    $(Self::$variant => $code,)*
                    Self::Proprietary(v) => v,
                }
            }

            pub const fn from_u16(value: u16) -> Self {
                match value {
                    $($code => Self::$variant,)*
                    v => Self::Proprietary(v),
                }
            }
        }
    };
}

object_types! {
    AnalogInput = 0,
    AnalogOutput = 1,
    AnalogValue = 2,
    BinaryInput = 3,
    BinaryOutput = 4,
    BinaryValue = 5,
    Calendar = 6,
    Command = 7,
    Device = 8,
    EventEnrollment = 9,
    File = 10,
    Group = 11,
    Loop = 12,
    MultiStateInput = 13,
    MultiStateOutput = 14,
    NotificationClass = 15,
    Program = 16,
    Schedule = 17,
    Averaging = 18,
    MultiStateValue = 19,
    TrendLog = 20,
    Accumulator = 23,
    PulseConverter = 24,
    EventLog = 25,
    TrendLogMultiple = 27,
    StructuredView = 29,
    CharacterStringValue = 40,
    IntegerValue = 45,
    PositiveIntegerValue = 48,
    NetworkPort = 56,
}
