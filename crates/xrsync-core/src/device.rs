//! Device modes and tracked hands

use std::fmt;

/// Tracked hand
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Wire emission order
    pub const ORDER: [Hand; 2] = [Hand::Left, Hand::Right];
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => write!(f, "LEFT"),
            Hand::Right => write!(f, "RIGHT"),
        }
    }
}

/// Kind of device session driving the local user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Headset with head and two tracked hands
    Immersive,
    /// Desktop or mobile: head only
    #[default]
    NonImmersive,
}

impl DeviceKind {
    #[inline]
    pub fn is_immersive(self) -> bool {
        matches!(self, DeviceKind::Immersive)
    }
}
