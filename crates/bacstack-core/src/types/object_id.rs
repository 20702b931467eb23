use crate::types::ObjectType;
use crate::ValueError;

/// Largest object type that fits the 10-bit type field.
pub const MAX_OBJECT_TYPE: u16 = 0x03FF;
/// Largest instance number that fits the 22-bit instance field.
pub const MAX_INSTANCE: u32 = 0x3F_FFFF;

/// A packed BACnet object identifier combining an [`ObjectType`] and a 22-bit
/// instance number into a single `u32`.
///
/// The upper 10 bits encode the object type and the lower 22 bits encode the
/// instance number, matching the BACnet wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates an `ObjectId` from a type and instance number.
    ///
    /// Fails when either part does not fit its bit field.
    pub fn new(object_type: ObjectType, instance: u32) -> Result<Self, ValueError> {
        Self::from_parts(object_type.to_u16(), instance)
    }

    /// Creates an `ObjectId` from a raw numeric type and instance number.
    pub fn from_parts(object_type: u16, instance: u32) -> Result<Self, ValueError> {
        if object_type > MAX_OBJECT_TYPE {
            return Err(ValueError::InvalidDomain("object type exceeds 10 bits"));
        }
        if instance > MAX_INSTANCE {
            return Err(ValueError::InvalidDomain("object instance exceeds 22 bits"));
        }
        Ok(Self(((object_type as u32) << 22) | instance))
    }

    /// Returns the raw packed `u32` representation.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Constructs an `ObjectId` from a pre-packed `u32`. Every `u32` is a
    /// valid packing.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Extracts the [`ObjectType`] from the upper 10 bits.
    pub const fn object_type(self) -> ObjectType {
        ObjectType::from_u16(self.object_type_raw())
    }

    pub const fn object_type_raw(self) -> u16 {
        ((self.0 >> 22) & MAX_OBJECT_TYPE as u32) as u16
    }

    /// Extracts the 22-bit instance number.
    pub const fn instance(self) -> u32 {
        self.0 & MAX_INSTANCE
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectId, MAX_INSTANCE, MAX_OBJECT_TYPE};
    use crate::types::ObjectType;
    use crate::ValueError;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn packing_roundtrips_over_the_whole_domain(
            t in 0u16..=MAX_OBJECT_TYPE,
            i in 0u32..=MAX_INSTANCE,
        ) {
            let id = ObjectId::from_parts(t, i).unwrap();
            let back = ObjectId::from_raw(id.raw());
            prop_assert_eq!(back.object_type_raw(), t);
            prop_assert_eq!(back.instance(), i);
        }
    }

    #[test]
    fn packs_device_instance() {
        let id = ObjectId::new(ObjectType::Device, 9999).unwrap();
        assert_eq!(id.raw(), 0x0200_270F);
        assert_eq!(id.object_type(), ObjectType::Device);
        assert_eq!(id.instance(), 9999);
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert!(matches!(
            ObjectId::from_parts(1024, 0),
            Err(ValueError::InvalidDomain(_))
        ));
        assert!(matches!(
            ObjectId::new(ObjectType::AnalogInput, MAX_INSTANCE + 1),
            Err(ValueError::InvalidDomain(_))
        ));
        assert!(ObjectId::new(ObjectType::Proprietary(MAX_OBJECT_TYPE), MAX_INSTANCE).is_ok());
    }
}
