macro_rules! property_ids {
    ($($variant:ident = $code:literal,)*) => {
        /// BACnet property identifiers.
        ///
        /// Common standard properties are named variants; vendor-specific or
        /// unrecognised identifiers use [`Proprietary`](Self::Proprietary).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum PropertyId {
            $($variant,)*
            Proprietary(u32),
        }

        impl PropertyId {
            pub const fn to_u32(self) -> u32 {
                match self {
                    $(Self::$variant => $code,)*
                    Self::Proprietary(v) => v,
                }
            }

            pub const fn from_u32(value: u32) -> Self {
                match value {
                    $($code => Self::$variant,)*
                    v => Self::Proprietary(v),
                }
            }
        }
    };
}

property_ids! {
    CovIncrement = 22,
    Description = 28,
    EventState = 36,
    MaxApduLengthAccepted = 62,
    ObjectIdentifier = 75,
    ObjectList = 76,
    ObjectName = 77,
    ObjectType = 79,
    OutOfService = 81,
    PresentValue = 85,
    PriorityArray = 87,
    Reliability = 103,
    RelinquishDefault = 104,
    SegmentationSupported = 107,
    StatusFlags = 111,
    Units = 117,
    VendorIdentifier = 120,
    VendorName = 121,
}

#[cfg(test)]
mod tests {
    use super::PropertyId;

    #[test]
    fn maps_standard_and_proprietary_ids() {
        assert_eq!(PropertyId::from_u32(77), PropertyId::ObjectName);
        assert_eq!(PropertyId::PresentValue.to_u32(), 85);
        assert_eq!(PropertyId::from_u32(5012), PropertyId::Proprietary(5012));
        assert_eq!(PropertyId::Proprietary(5012).to_u32(), 5012);
    }
}
