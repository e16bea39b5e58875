//! arbor-api-core: property value model and addressing (core, engine-agnostic)

pub mod convert;
pub mod index;
pub mod map;
pub mod rotation;
pub mod value;

pub use index::{AccessMode, ComponentIndex, PropertyIndex, PropertyKey, PropertyRange};
pub use map::{MapKey, PropertyMap};
pub use rotation::{AngleAxis, Quaternion, Rotation};
pub use value::{Extents, PropertyType, PropertyValue, Rect, ValueError};
