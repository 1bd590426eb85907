//! User scale setting
//!
//! Relative positions are divided by the scale, so it has to stay well away
//! from zero.

use crate::{XrsyncError, XrsyncResult};

/// Smallest accepted user scale
pub const MIN_USER_SCALE: f32 = 1e-6;

/// Validated user scale factor
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct UserScale(f32);

impl UserScale {
    pub const ONE: UserScale = UserScale(1.0);

    /// Reject non-finite values and anything below [`MIN_USER_SCALE`]
    pub fn new(scale: f32) -> XrsyncResult<Self> {
        if !scale.is_finite() || scale < MIN_USER_SCALE {
            return Err(XrsyncError::InvalidUserScale(scale));
        }
        Ok(UserScale(scale))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for UserScale {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f32> for UserScale {
    type Error = XrsyncError;

    fn try_from(value: f32) -> XrsyncResult<Self> {
        UserScale::new(value)
    }
}

impl From<UserScale> for f32 {
    fn from(scale: UserScale) -> Self {
        scale.0
    }
}
