//! Per-frame user state encoder
//!
//! Packs a frame-consistent snapshot of the local user into a
//! [`UserStatePayload`]. Pure: every temporary is a local, nothing is kept
//! between frames.

use xrsync_core::{DeviceKind, Euler, EulerOrder, Hand, Quat, UserScale, Vec3};

use crate::{Pose, UserState, UserStatePayload};

/// Encoder configuration
#[derive(Clone, Debug)]
pub struct EncoderConfig {
    /// Velocities shorter than this are not sent
    pub velocity_threshold: f32,
    /// Absolute anchor position is sent on frames divisible by this (0 = never)
    pub position_interval: u64,
    /// Axis order used for rotations; must match the receiver
    pub euler_order: EulerOrder,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            velocity_threshold: 1e-5,
            position_interval: 300,
            euler_order: EulerOrder::Xyz,
        }
    }
}

impl EncoderConfig {
    /// Fewer velocity updates and sparser anchors
    pub fn low_bandwidth() -> Self {
        EncoderConfig {
            velocity_threshold: 1e-3,
            position_interval: 600,
            ..Default::default()
        }
    }

    /// Frequent anchors for fast drift correction
    pub fn high_fidelity() -> Self {
        EncoderConfig {
            velocity_threshold: 1e-6,
            position_interval: 90,
            ..Default::default()
        }
    }

    #[inline]
    fn sends_position(&self, frame: u64) -> bool {
        self.position_interval != 0 && frame % self.position_interval == 0
    }
}

/// One tracked hand as seen this frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandSnapshot {
    pub in_scene: bool,
    pub world_position: Vec3,
    pub world_orientation: Quat,
}

impl HandSnapshot {
    pub fn new(world_position: Vec3, world_orientation: Quat) -> Self {
        Self {
            in_scene: true,
            world_position,
            world_orientation,
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }
}

/// Device-specific part of a snapshot
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceSnapshot {
    Immersive {
        left: HandSnapshot,
        right: HandSnapshot,
    },
    NonImmersive,
}

impl DeviceSnapshot {
    pub fn kind(&self) -> DeviceKind {
        match self {
            DeviceSnapshot::Immersive { .. } => DeviceKind::Immersive,
            DeviceSnapshot::NonImmersive => DeviceKind::NonImmersive,
        }
    }
}

/// Everything the encoder reads for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub device: DeviceSnapshot,
    pub camera_position: Vec3,
    pub camera_orientation: Quat,
    /// World position of the user anchor
    pub anchor_position: Vec3,
    pub user_scale: UserScale,
    /// World velocity of the movement body
    pub velocity: Vec3,
    pub frame: u64,
}

impl FrameSnapshot {
    /// Head-only snapshot at the origin
    pub fn non_immersive(frame: u64) -> Self {
        FrameSnapshot {
            device: DeviceSnapshot::NonImmersive,
            camera_position: Vec3::ZERO,
            camera_orientation: Quat::IDENTITY,
            anchor_position: Vec3::ZERO,
            user_scale: UserScale::ONE,
            velocity: Vec3::ZERO,
            frame,
        }
    }

    /// Headset snapshot at the origin with both hands absent
    pub fn immersive(frame: u64) -> Self {
        FrameSnapshot {
            device: DeviceSnapshot::Immersive {
                left: HandSnapshot::absent(),
                right: HandSnapshot::absent(),
            },
            ..Self::non_immersive(frame)
        }
    }

    pub fn hand(&self, hand: Hand) -> Option<&HandSnapshot> {
        match (&self.device, hand) {
            (DeviceSnapshot::Immersive { left, .. }, Hand::Left) => Some(left),
            (DeviceSnapshot::Immersive { right, .. }, Hand::Right) => Some(right),
            (DeviceSnapshot::NonImmersive, _) => None,
        }
    }
}

/// User state encoder
#[derive(Clone, Debug, Default)]
pub struct UserStateEncoder {
    config: EncoderConfig,
}

impl UserStateEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode one frame
    pub fn encode(&self, snapshot: &FrameSnapshot) -> UserStatePayload {
        self.build(snapshot).pack()
    }

    /// Segment selection without packing
    pub fn build(&self, snapshot: &FrameSnapshot) -> UserState {
        let mut state = UserState::new();

        if let DeviceSnapshot::Immersive { left, right } = &snapshot.device {
            state.avatar = Some(self.relative_pose(
                snapshot,
                snapshot.camera_position,
                snapshot.camera_orientation,
            ));

            for (hand, tracked) in Hand::ORDER.into_iter().zip([left, right]) {
                if tracked.in_scene {
                    let pose = self.relative_pose(
                        snapshot,
                        tracked.world_position,
                        tracked.world_orientation,
                    );
                    state.set_hand(hand, pose);
                }
            }
        }

        if snapshot.velocity.length() >= self.config.velocity_threshold {
            state.velocity = Some(snapshot.velocity);
        }

        if self.config.sends_position(snapshot.frame) {
            state.position = Some(snapshot.anchor_position);
        }

        state
    }

    fn relative_pose(&self, snapshot: &FrameSnapshot, world: Vec3, orientation: Quat) -> Pose {
        let position = (world - snapshot.anchor_position) / snapshot.user_scale.get();
        let rotation = Euler::from_quat(orientation, self.config.euler_order).truncated();
        Pose::new(position, rotation)
    }
}
