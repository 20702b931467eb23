pub mod object_id;
pub mod object_type;
pub mod property_id;

pub use object_id::{ObjectId, MAX_INSTANCE, MAX_OBJECT_TYPE};
pub use object_type::ObjectType;
pub use property_id::PropertyId;
