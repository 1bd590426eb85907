//! Collaborators sampled by the controller
//!
//! The controller never owns transforms; it reads them through these traits
//! once per frame. Shared handles are provided for hosts that push tracking
//! data from elsewhere.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use xrsync_core::{DeviceKind, Quat, Vec3};

/// Anything with a world transform
pub trait WorldTracked: Send {
    fn world_position(&self) -> Vec3;
    fn world_orientation(&self) -> Quat;
}

/// Tracked hand input
pub trait TrackedHand: WorldTracked {
    /// Whether the hand is currently represented in the scene
    fn is_in_scene(&self) -> bool;
}

/// Locally controlled movement body
pub trait MovementBody: Send {
    fn world_velocity(&self) -> Vec3;
}

/// Render frame counter
pub trait FrameCounter: Send {
    fn frame(&self) -> u64;
}

/// The local user's tracked objects
///
/// Hands only exist on immersive rigs.
pub enum UserRig {
    Immersive {
        camera: Box<dyn WorldTracked>,
        anchor: Box<dyn WorldTracked>,
        left: Box<dyn TrackedHand>,
        right: Box<dyn TrackedHand>,
    },
    NonImmersive {
        camera: Box<dyn WorldTracked>,
        anchor: Box<dyn WorldTracked>,
    },
}

impl UserRig {
    pub fn kind(&self) -> DeviceKind {
        match self {
            UserRig::Immersive { .. } => DeviceKind::Immersive,
            UserRig::NonImmersive { .. } => DeviceKind::NonImmersive,
        }
    }

    pub fn camera(&self) -> &dyn WorldTracked {
        match self {
            UserRig::Immersive { camera, .. } | UserRig::NonImmersive { camera, .. } => {
                camera.as_ref()
            }
        }
    }

    pub fn anchor(&self) -> &dyn WorldTracked {
        match self {
            UserRig::Immersive { anchor, .. } | UserRig::NonImmersive { anchor, .. } => {
                anchor.as_ref()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct TrackedState {
    position: Vec3,
    orientation: Quat,
    in_scene: bool,
}

/// Shared transform handle, cheap to clone
#[derive(Clone, Debug, Default)]
pub struct SharedTransform {
    inner: Arc<RwLock<TrackedState>>,
}

impl SharedTransform {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TrackedState {
                position,
                orientation,
                in_scene: true,
            })),
        }
    }

    pub fn set_position(&self, position: Vec3) {
        self.inner.write().position = position;
    }

    pub fn set_orientation(&self, orientation: Quat) {
        self.inner.write().orientation = orientation;
    }

    pub fn set_in_scene(&self, in_scene: bool) {
        self.inner.write().in_scene = in_scene;
    }
}

impl WorldTracked for SharedTransform {
    fn world_position(&self) -> Vec3 {
        self.inner.read().position
    }

    fn world_orientation(&self) -> Quat {
        self.inner.read().orientation
    }
}

impl TrackedHand for SharedTransform {
    fn is_in_scene(&self) -> bool {
        self.inner.read().in_scene
    }
}

/// Shared velocity handle
#[derive(Clone, Debug, Default)]
pub struct SharedVelocity {
    inner: Arc<RwLock<Vec3>>,
}

impl SharedVelocity {
    pub fn new(velocity: Vec3) -> Self {
        Self {
            inner: Arc::new(RwLock::new(velocity)),
        }
    }

    pub fn set(&self, velocity: Vec3) {
        *self.inner.write() = velocity;
    }
}

impl MovementBody for SharedVelocity {
    fn world_velocity(&self) -> Vec3 {
        *self.inner.read()
    }
}

/// Frame counter advanced by the render loop
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    frame: Arc<AtomicU64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(frame: u64) -> Self {
        Self {
            frame: Arc::new(AtomicU64::new(frame)),
        }
    }

    /// Move to the next frame, returning it
    pub fn advance(&self) -> u64 {
        self.frame.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl FrameCounter for FrameClock {
    fn frame(&self) -> u64 {
        self.frame.load(Ordering::Relaxed)
    }
}
