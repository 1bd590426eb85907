//! Remote user reconstruction
//!
//! Peers send poses relative to their own anchor, a velocity while they move,
//! and their absolute anchor position every few hundred frames. Between
//! anchors the receiver dead-reckons the anchor from the last velocity.

use std::time::Duration;

use tracing::debug;
use xrsync_core::{EulerOrder, Hand, Quat, UserScale, Vec3, XrsyncResult};
use xrsync_wire::{decode_user_state, Pose, UserState};

/// Remote user configuration
#[derive(Clone, Debug)]
pub struct RemoteUserConfig {
    /// Must match the sender's encoder
    pub euler_order: EulerOrder,
    /// Stop dead-reckoning when no message arrived for this long
    pub velocity_timeout: Duration,
}

impl Default for RemoteUserConfig {
    fn default() -> Self {
        Self {
            euler_order: EulerOrder::Xyz,
            velocity_timeout: Duration::from_millis(250),
        }
    }
}

/// Reconstructed state of one peer
#[derive(Clone, Debug)]
pub struct RemoteUser {
    config: RemoteUserConfig,
    scale: UserScale,
    anchor: Option<Vec3>,
    velocity: Vec3,
    avatar: Option<Pose>,
    left_hand: Option<Pose>,
    right_hand: Option<Pose>,
    since_message: Duration,
    last_correction: Option<f32>,
    messages: u64,
}

impl RemoteUser {
    pub fn new(config: RemoteUserConfig) -> Self {
        Self {
            config,
            scale: UserScale::ONE,
            anchor: None,
            velocity: Vec3::ZERO,
            avatar: None,
            left_hand: None,
            right_hand: None,
            since_message: Duration::ZERO,
            last_correction: None,
            messages: 0,
        }
    }

    /// The peer's user scale, learned out of band
    pub fn set_scale(&mut self, scale: UserScale) {
        self.scale = scale;
    }

    pub fn scale(&self) -> UserScale {
        self.scale
    }

    /// Decode and apply a wire message
    pub fn receive(&mut self, bytes: &[u8]) -> XrsyncResult<()> {
        let state = decode_user_state(bytes)?;
        self.apply(&state);
        Ok(())
    }

    /// Apply one decoded message
    pub fn apply(&mut self, state: &UserState) {
        self.messages += 1;
        self.since_message = Duration::ZERO;

        // Pose segments describe this frame only: absent means not tracked
        self.avatar = state.avatar;
        self.left_hand = state.left_hand;
        self.right_hand = state.right_hand;

        // Below the sender's threshold the segment is omitted
        self.velocity = state.velocity.unwrap_or(Vec3::ZERO);

        if let Some(position) = state.position {
            if let Some(predicted) = self.anchor {
                let drift = predicted.distance(position);
                debug!(drift, "remote anchor corrected");
                self.last_correction = Some(drift);
            }
            self.anchor = Some(position);
        }
    }

    /// Advance the dead-reckoned anchor
    pub fn advance(&mut self, dt: Duration) {
        self.since_message += dt;
        if self.since_message > self.config.velocity_timeout {
            return;
        }
        if let Some(anchor) = self.anchor.as_mut() {
            *anchor += self.velocity * dt.as_secs_f32();
        }
    }

    /// Estimated anchor, once the first absolute position arrived
    pub fn anchor(&self) -> Option<Vec3> {
        self.anchor
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Distance between prediction and the last absolute update
    pub fn last_correction(&self) -> Option<f32> {
        self.last_correction
    }

    pub fn messages_received(&self) -> u64 {
        self.messages
    }

    pub fn is_immersive(&self) -> bool {
        self.avatar.is_some()
    }

    pub fn hand_pose(&self, hand: Hand) -> Option<&Pose> {
        match hand {
            Hand::Left => self.left_hand.as_ref(),
            Hand::Right => self.right_hand.as_ref(),
        }
    }

    fn to_world(&self, pose: &Pose) -> Option<Vec3> {
        Some(self.anchor? + pose.position * self.scale.get())
    }

    pub fn avatar_world_position(&self) -> Option<Vec3> {
        self.to_world(self.avatar.as_ref()?)
    }

    pub fn avatar_orientation(&self) -> Option<Quat> {
        self.avatar
            .as_ref()
            .map(|pose| pose.orientation(self.config.euler_order))
    }

    pub fn hand_world_position(&self, hand: Hand) -> Option<Vec3> {
        self.to_world(self.hand_pose(hand)?)
    }

    pub fn hand_orientation(&self, hand: Hand) -> Option<Quat> {
        self.hand_pose(hand)
            .map(|pose| pose.orientation(self.config.euler_order))
    }
}

impl Default for RemoteUser {
    fn default() -> Self {
        Self::new(RemoteUserConfig::default())
    }
}
