//! XRSYNC Wire Protocol - Per-frame user state message
//!
//! A message is two buffers:
//! - Message codes (1 byte, one flag per present segment)
//! - Segment floats (f32 LE, fixed segment order, no length prefix)
//!
//! Segment order and sizes:
//! - AVATAR: relative head position (3) + rotation (2)
//! - LEFT_HAND / RIGHT_HAND: relative hand position (3) + rotation (2)
//! - USER_VELOCITY: world velocity (3)
//! - USER_POSITION: absolute anchor position (3)

pub mod codes;
pub mod encoder;
pub mod payload;
pub mod state;

pub use codes::*;
pub use encoder::*;
pub use payload::*;
pub use state::*;
