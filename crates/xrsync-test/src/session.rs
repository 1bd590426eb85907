//! Two-peer session simulator
//!
//! Drives a real [`UserController`] from a scripted motion, carries its
//! payloads over a [`LossyLink`] and feeds them to a [`RemoteUser`].

use std::time::Duration;

use tracing::warn;
use xrsync_core::{Quat, UserScale, Vec3};
use xrsync_runtime::{
    ControllerConfig, FrameClock, RemoteUser, RemoteUserConfig, SharedTransform, SharedVelocity,
    UserController, UserRig,
};
use xrsync_wire::UserStatePayload;

use crate::{LinkConfig, LossyLink};

/// Scripted movement of the local user's anchor
#[derive(Clone, Copy, Debug)]
pub enum Motion {
    Idle,
    /// Constant world velocity
    Linear(Vec3),
    /// Horizontal circle around the origin
    Circle { radius: f32, angular_speed: f32 },
}

impl Motion {
    fn velocity_at(&self, t: f32) -> Vec3 {
        match *self {
            Motion::Idle => Vec3::ZERO,
            Motion::Linear(v) => v,
            Motion::Circle {
                radius,
                angular_speed,
            } => {
                let (s, c) = (angular_speed * t).sin_cos();
                Vec3::new(-s, 0.0, c) * (radius * angular_speed)
            }
        }
    }
}

/// Session configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub frame_time: Duration,
    pub immersive: bool,
    pub user_scale: UserScale,
    pub controller: ControllerConfig,
    pub link: LinkConfig,
    pub remote: RemoteUserConfig,
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            frame_time: Duration::from_micros(16_667),
            immersive: true,
            user_scale: UserScale::ONE,
            controller: ControllerConfig::default(),
            link: LinkConfig::perfect(),
            remote: RemoteUserConfig::default(),
            seed: 1,
        }
    }
}

/// Local handles the simulator moves each frame
struct LocalRig {
    camera: SharedTransform,
    anchor: SharedTransform,
    left: SharedTransform,
    right: SharedTransform,
    velocity: SharedVelocity,
    clock: FrameClock,
}

/// Two-peer session
pub struct SessionSimulator {
    config: SessionConfig,
    motion: Motion,
    local: LocalRig,
    anchor: Vec3,
    elapsed: f32,
    controller: UserController<Vec<UserStatePayload>>,
    link: LossyLink,
    remote: RemoteUser,
    decode_errors: u64,
}

impl SessionSimulator {
    pub fn new(config: SessionConfig, motion: Motion) -> Self {
        let local = LocalRig {
            camera: SharedTransform::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY),
            anchor: SharedTransform::new(Vec3::ZERO, Quat::IDENTITY),
            left: SharedTransform::new(Vec3::new(-0.25, 1.1, -0.3), Quat::IDENTITY),
            right: SharedTransform::new(Vec3::new(0.25, 1.1, -0.3), Quat::IDENTITY),
            velocity: SharedVelocity::default(),
            clock: FrameClock::new(),
        };

        let rig = if config.immersive {
            UserRig::Immersive {
                camera: Box::new(local.camera.clone()),
                anchor: Box::new(local.anchor.clone()),
                left: Box::new(local.left.clone()),
                right: Box::new(local.right.clone()),
            }
        } else {
            UserRig::NonImmersive {
                camera: Box::new(local.camera.clone()),
                anchor: Box::new(local.anchor.clone()),
            }
        };

        let controller_config = ControllerConfig {
            user_scale: config.user_scale,
            ..config.controller.clone()
        };
        let controller = UserController::new(
            rig,
            Box::new(local.velocity.clone()),
            Box::new(local.clock.clone()),
            Vec::new(),
            controller_config,
        );

        let mut remote = RemoteUser::new(config.remote.clone());
        remote.set_scale(config.user_scale);

        SessionSimulator {
            link: LossyLink::with_seed(config.link.clone(), config.seed),
            config,
            motion,
            local,
            anchor: Vec3::ZERO,
            elapsed: 0.0,
            controller,
            remote,
            decode_errors: 0,
        }
    }

    /// Simulate one frame on both peers
    pub fn step(&mut self) {
        let dt = self.config.frame_time.as_secs_f32();
        let velocity = self.motion.velocity_at(self.elapsed);

        self.local.velocity.set(velocity);
        self.local.anchor.set_position(self.anchor);
        self.local
            .camera
            .set_position(self.anchor + Vec3::new(0.0, 1.6, 0.0) * self.config.user_scale.get());

        self.controller.tick();
        for payload in self.controller.sink_mut().drain(..) {
            self.link.send(payload.to_bytes());
        }

        for packet in self.link.tick() {
            if let Err(e) = self.remote.receive(&packet) {
                warn!(error = %e, "remote failed to decode payload");
                self.decode_errors += 1;
            }
        }
        self.remote.advance(self.config.frame_time);

        self.anchor += velocity * dt;
        self.elapsed += dt;
        self.local.clock.advance();
    }

    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// True anchor position of the local user
    pub fn local_anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Distance between the remote estimate and the true anchor
    pub fn anchor_error(&self) -> Option<f32> {
        self.remote.anchor().map(|a| a.distance(self.anchor))
    }

    pub fn set_hand_in_scene(&self, left: bool, right: bool) {
        self.local.left.set_in_scene(left);
        self.local.right.set_in_scene(right);
    }

    pub fn controller(&self) -> &UserController<Vec<UserStatePayload>> {
        &self.controller
    }

    pub fn remote(&self) -> &RemoteUser {
        &self.remote
    }

    pub fn link(&self) -> &LossyLink {
        &self.link
    }

    pub fn decode_errors(&self) -> u64 {
        self.decode_errors
    }
}
