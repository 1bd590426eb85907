//! XRSYNC Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every XRSYNC crate:
//! - Vector and quaternion math (Vec3, Quat)
//! - Euler angles with an explicit axis order
//! - User scale and device/hand identifiers
//! - The workspace error type

pub mod device;
pub mod error;
pub mod euler;
pub mod math;
pub mod scale;

pub use device::*;
pub use error::*;
pub use euler::*;
pub use math::*;
pub use scale::*;
