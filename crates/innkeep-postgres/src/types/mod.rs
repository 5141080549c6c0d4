//! Contains constraints, enumerations and other custom types.

mod constraint;
mod enums;

pub use constraint::{
    ConstraintCategory, ConstraintViolation, HotelPlatformConstraints, UserConstraints,
};
pub use enums::PlatformType;
