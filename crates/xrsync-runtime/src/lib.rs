//! XRSYNC Runtime - Per-frame user state synchronization
//!
//! Sending side: [`UserController`] samples the local rig once per frame,
//! encodes it and hands non-empty payloads to a [`PayloadSink`].
//!
//! Receiving side: [`RemoteUser`] applies decoded messages and dead-reckons
//! the peer's anchor between absolute position updates.

pub mod controller;
pub mod fade;
pub mod logging;
pub mod remote;
pub mod rig;
pub mod sink;

pub use controller::*;
pub use fade::*;
pub use logging::*;
pub use remote::*;
pub use rig::*;
pub use sink::*;
