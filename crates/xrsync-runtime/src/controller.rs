//! Local user controller - samples the rig and emits one payload per frame

use std::collections::VecDeque;

use tracing::{debug, trace, warn};
use xrsync_core::{DeviceKind, Hand, UserScale, XrsyncResult};
use xrsync_wire::{
    DeviceSnapshot, EncoderConfig, FrameSnapshot, HandSnapshot, Segment, UserStateEncoder,
    UserStatePayload,
};

use crate::{AvatarFade, FadeAction, FrameCounter, MovementBody, PayloadSink, TrackedHand, UserRig};

/// Avatar shown until the user picks one
pub const DEFAULT_AVATAR_URL: &str =
    "https://d1a370nemizbjq.cloudfront.net/6a141c79-d6e5-4b0d-aa0d-524a8b9b54a4.glb";

/// Controller configuration
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Wire encoder settings
    pub encoder: EncoderConfig,
    /// Initial avatar URL
    pub avatar_url: String,
    /// Initial user scale
    pub user_scale: UserScale,
    /// Maximum queued user events before the oldest are dropped
    pub max_events: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            encoder: EncoderConfig::default(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            user_scale: UserScale::ONE,
            max_events: 64,
        }
    }
}

/// Setting changes observed by the host
#[derive(Clone, Debug, PartialEq)]
pub enum UserEvent {
    ScaleUpdated(UserScale),
    AvatarUpdated(String),
}

#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub ticks: u64,
    pub payloads_sent: u64,
    pub payloads_skipped: u64,
    pub payloads_dropped: u64,
    pub anchors_sent: u64,
    pub bytes_sent: u64,
}

/// Local user controller
pub struct UserController<S: PayloadSink> {
    rig: UserRig,
    movement: Box<dyn MovementBody>,
    frames: Box<dyn FrameCounter>,
    encoder: UserStateEncoder,
    sink: S,
    user_scale: UserScale,
    avatar_url: String,
    fade: AvatarFade,
    events: VecDeque<UserEvent>,
    max_events: usize,
    stats: RuntimeStats,
}

impl<S: PayloadSink> UserController<S> {
    pub fn new(
        rig: UserRig,
        movement: Box<dyn MovementBody>,
        frames: Box<dyn FrameCounter>,
        sink: S,
        config: ControllerConfig,
    ) -> Self {
        UserController {
            rig,
            movement,
            frames,
            encoder: UserStateEncoder::new(config.encoder),
            sink,
            user_scale: config.user_scale,
            avatar_url: config.avatar_url,
            fade: AvatarFade::new(),
            events: VecDeque::new(),
            max_events: config.max_events,
            stats: RuntimeStats::default(),
        }
    }

    pub fn device_kind(&self) -> DeviceKind {
        self.rig.kind()
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn user_scale(&self) -> UserScale {
        self.user_scale
    }

    /// Validate and apply a new user scale
    pub fn set_user_scale(&mut self, scale: f32) -> XrsyncResult<()> {
        let scale = UserScale::new(scale)?;
        if scale != self.user_scale {
            self.user_scale = scale;
            self.push_event(UserEvent::ScaleUpdated(scale));
        }
        Ok(())
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    pub fn update_avatar(&mut self, url: impl Into<String>) {
        self.avatar_url = url.into();
        debug!(url = %self.avatar_url, "avatar updated");
        self.push_event(UserEvent::AvatarUpdated(self.avatar_url.clone()));
    }

    /// Drain pending setting events
    pub fn drain_events(&mut self) -> Vec<UserEvent> {
        self.events.drain(..).collect()
    }

    fn push_event(&mut self, event: UserEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Distance between the tracked hands (immersive only)
    pub fn distance_between_hands(&self) -> Option<f32> {
        match &self.rig {
            UserRig::Immersive { left, right, .. } => {
                Some(left.world_position().distance(right.world_position()))
            }
            UserRig::NonImmersive { .. } => None,
        }
    }

    /// Fade the local avatar as the camera approaches it (non-immersive only)
    pub fn update_avatar_fade(&mut self, controls_update: u64, camera_distance: f32) -> FadeAction {
        if self.rig.kind().is_immersive() {
            return FadeAction::None;
        }
        self.fade.update(controls_update, camera_distance)
    }

    /// Sample every collaborator once
    pub fn snapshot(&self) -> FrameSnapshot {
        let device = match &self.rig {
            UserRig::Immersive { left, right, .. } => DeviceSnapshot::Immersive {
                left: sample_hand(left.as_ref()),
                right: sample_hand(right.as_ref()),
            },
            UserRig::NonImmersive { .. } => DeviceSnapshot::NonImmersive,
        };

        let camera = self.rig.camera();
        FrameSnapshot {
            device,
            camera_position: camera.world_position(),
            camera_orientation: camera.world_orientation(),
            anchor_position: self.rig.anchor().world_position(),
            user_scale: self.user_scale,
            velocity: self.movement.world_velocity(),
            frame: self.frames.frame(),
        }
    }

    /// Encode this frame and send it if any segment applies
    pub fn tick(&mut self) -> Option<UserStatePayload> {
        let snapshot = self.snapshot();
        let payload = self.encoder.encode(&snapshot);
        self.stats.ticks += 1;

        if payload.is_empty() {
            trace!(frame = snapshot.frame, "no user state this frame");
            self.stats.payloads_skipped += 1;
            return None;
        }

        trace!(
            frame = snapshot.frame,
            codes = payload.codes().bits(),
            floats = payload.floats().len(),
            "user state encoded"
        );
        if payload.codes().contains(Segment::UserPosition) {
            debug!(
                frame = snapshot.frame,
                anchor = ?snapshot.anchor_position,
                "sending anchor position"
            );
            self.stats.anchors_sent += 1;
        }

        match self.sink.send(&payload) {
            Ok(()) => {
                self.stats.payloads_sent += 1;
                self.stats.bytes_sent += payload.wire_size() as u64;
            }
            Err(e) => {
                warn!(frame = snapshot.frame, error = %e, "dropping user state payload");
                self.stats.payloads_dropped += 1;
            }
        }

        Some(payload)
    }
}

fn sample_hand(hand: &dyn TrackedHand) -> HandSnapshot {
    if !hand.is_in_scene() {
        return HandSnapshot::absent();
    }
    HandSnapshot::new(hand.world_position(), hand.world_orientation())
}

/// Which hands a snapshot reports as in scene
pub fn hands_in_scene(snapshot: &FrameSnapshot) -> Vec<Hand> {
    Hand::ORDER
        .into_iter()
        .filter(|&hand| snapshot.hand(hand).is_some_and(|h| h.in_scene))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChannelSink, FrameClock, SharedTransform, SharedVelocity};
    use xrsync_core::{Quat, Vec3, XrsyncError};
    use xrsync_wire::MessageCodes;

    struct Fixture {
        camera: SharedTransform,
        anchor: SharedTransform,
        left: SharedTransform,
        right: SharedTransform,
        velocity: SharedVelocity,
        clock: FrameClock,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                camera: SharedTransform::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY),
                anchor: SharedTransform::new(Vec3::ZERO, Quat::IDENTITY),
                left: SharedTransform::new(Vec3::new(-0.2, 1.0, -0.3), Quat::IDENTITY),
                right: SharedTransform::new(Vec3::new(0.2, 1.0, -0.3), Quat::IDENTITY),
                velocity: SharedVelocity::default(),
                clock: FrameClock::starting_at(1),
            }
        }

        fn immersive(&self) -> UserController<Vec<UserStatePayload>> {
            let rig = UserRig::Immersive {
                camera: Box::new(self.camera.clone()),
                anchor: Box::new(self.anchor.clone()),
                left: Box::new(self.left.clone()),
                right: Box::new(self.right.clone()),
            };
            self.controller(rig)
        }

        fn non_immersive(&self) -> UserController<Vec<UserStatePayload>> {
            let rig = UserRig::NonImmersive {
                camera: Box::new(self.camera.clone()),
                anchor: Box::new(self.anchor.clone()),
            };
            self.controller(rig)
        }

        fn controller(&self, rig: UserRig) -> UserController<Vec<UserStatePayload>> {
            UserController::new(
                rig,
                Box::new(self.velocity.clone()),
                Box::new(self.clock.clone()),
                Vec::new(),
                ControllerConfig::default(),
            )
        }
    }

    #[test]
    fn test_idle_non_immersive_sends_nothing() {
        let fx = Fixture::new();
        let mut controller = fx.non_immersive();

        assert!(controller.tick().is_none());
        assert!(controller.sink().is_empty());
        assert_eq!(controller.stats().payloads_skipped, 1);
    }

    #[test]
    fn test_anchor_on_interval() {
        let fx = Fixture::new();
        let mut controller = fx.non_immersive();
        fx.anchor.set_position(Vec3::new(4.0, 0.0, 2.0));

        let mut anchors = 0;
        for _ in 0..600 {
            if controller.tick().is_some() {
                anchors += 1;
            }
            fx.clock.advance();
        }

        // Frames 300 and 600 within 1..=600
        assert_eq!(anchors, 2);
        assert_eq!(controller.stats().anchors_sent, 2);
        assert_eq!(controller.sink()[0].floats(), &[4.0, 0.0, 2.0]);
    }

    #[test]
    fn test_immersive_tracks_hands() {
        let fx = Fixture::new();
        let mut controller = fx.immersive();

        let payload = controller.tick().unwrap();
        assert_eq!(
            payload.codes().bits(),
            MessageCodes::AVATAR | MessageCodes::LEFT_HAND | MessageCodes::RIGHT_HAND
        );

        fx.left.set_in_scene(false);
        fx.velocity.set(Vec3::new(1.0, 0.0, 0.0));
        fx.clock.advance();

        let payload = controller.tick().unwrap();
        assert_eq!(
            payload.codes().bits(),
            MessageCodes::AVATAR | MessageCodes::RIGHT_HAND | MessageCodes::USER_VELOCITY
        );
        assert_eq!(payload.floats().len(), 13);
        assert_eq!(controller.stats().payloads_sent, 2);
    }

    #[test]
    fn test_snapshot_uses_current_scale() {
        let fx = Fixture::new();
        let mut controller = fx.immersive();
        controller.set_user_scale(2.0).unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.user_scale.get(), 2.0);
        assert_eq!(hands_in_scene(&snapshot), vec![Hand::Left, Hand::Right]);

        let avatar = controller.tick().and_then(|p| p.unpack().ok()).and_then(|s| s.avatar);
        assert_eq!(avatar.map(|a| a.position), Some(Vec3::new(0.0, 0.8, 0.0)));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let fx = Fixture::new();
        let mut controller = fx.non_immersive();

        assert_eq!(
            controller.set_user_scale(0.0),
            Err(XrsyncError::InvalidUserScale(0.0))
        );
        assert_eq!(controller.user_scale(), UserScale::ONE);
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_setting_events() {
        let fx = Fixture::new();
        let mut controller = fx.non_immersive();
        assert_eq!(controller.avatar_url(), DEFAULT_AVATAR_URL);

        controller.set_user_scale(1.5).unwrap();
        controller.update_avatar("https://example.com/me.glb");

        let events = controller.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], UserEvent::ScaleUpdated(_)));
        assert_eq!(
            events[1],
            UserEvent::AvatarUpdated("https://example.com/me.glb".into())
        );
        assert_eq!(controller.avatar_url(), "https://example.com/me.glb");
    }

    #[test]
    fn test_distance_between_hands() {
        let fx = Fixture::new();
        let distance = fx.immersive().distance_between_hands().unwrap();
        assert!((distance - 0.4).abs() < 1e-5);

        assert_eq!(fx.non_immersive().distance_between_hands(), None);
    }

    #[test]
    fn test_fade_only_without_headset() {
        let fx = Fixture::new();
        assert_eq!(fx.immersive().update_avatar_fade(1, 0.1), FadeAction::None);
        assert_eq!(fx.non_immersive().update_avatar_fade(1, 0.1), FadeAction::Hide);
    }

    #[test]
    fn test_dropped_payloads_are_counted() {
        let fx = Fixture::new();
        let (sink, rx) = crate::payload_channel(1);
        drop(rx);

        let rig = UserRig::NonImmersive {
            camera: Box::new(fx.camera.clone()),
            anchor: Box::new(fx.anchor.clone()),
        };
        let mut controller: UserController<ChannelSink> = UserController::new(
            rig,
            Box::new(fx.velocity.clone()),
            Box::new(fx.clock.clone()),
            sink,
            ControllerConfig::default(),
        );

        fx.velocity.set(Vec3::new(0.0, 0.0, 1.0));
        assert!(controller.tick().is_some());
        assert_eq!(controller.stats().payloads_dropped, 1);
        assert_eq!(controller.stats().payloads_sent, 0);
    }
}
