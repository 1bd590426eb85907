//! Decoded user state - the segments of one message

use xrsync_core::{Euler, EulerOrder, Hand, Quat, Vec3};

use crate::{MessageCodes, Segment, UserStatePayload};

/// Pose segment: relative position + the first two Euler angles
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: [f32; 2],
}

impl Pose {
    pub fn new(position: Vec3, rotation: [f32; 2]) -> Self {
        Self { position, rotation }
    }

    /// Orientation rebuilt with the dropped angle set to zero
    pub fn orientation(&self, order: EulerOrder) -> Quat {
        Euler::new(self.rotation[0], self.rotation[1], 0.0, order).to_quat()
    }

    fn write(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.position.to_array());
        out.extend_from_slice(&self.rotation);
    }

    fn read(floats: &[f32]) -> Self {
        Pose {
            position: Vec3::new(floats[0], floats[1], floats[2]),
            rotation: [floats[3], floats[4]],
        }
    }
}

/// User state carried by one message
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserState {
    /// Head pose relative to the user anchor, divided by user scale
    pub avatar: Option<Pose>,
    /// Left hand pose, same frame as `avatar`
    pub left_hand: Option<Pose>,
    /// Right hand pose, same frame as `avatar`
    pub right_hand: Option<Pose>,
    /// World-frame velocity of the movement body
    pub velocity: Option<Vec3>,
    /// Absolute world position of the user anchor
    pub position: Option<Vec3>,
}

impl UserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand(&self, hand: Hand) -> Option<&Pose> {
        match hand {
            Hand::Left => self.left_hand.as_ref(),
            Hand::Right => self.right_hand.as_ref(),
        }
    }

    pub fn set_hand(&mut self, hand: Hand, pose: Pose) {
        match hand {
            Hand::Left => self.left_hand = Some(pose),
            Hand::Right => self.right_hand = Some(pose),
        }
    }

    /// Codes for the segments that are present
    pub fn codes(&self) -> MessageCodes {
        let mut codes = MessageCodes::NONE;
        for segment in Segment::ORDER {
            if self.has(segment) {
                codes.insert(segment);
            }
        }
        codes
    }

    pub fn has(&self, segment: Segment) -> bool {
        match segment {
            Segment::Avatar => self.avatar.is_some(),
            Segment::LeftHand => self.left_hand.is_some(),
            Segment::RightHand => self.right_hand.is_some(),
            Segment::UserVelocity => self.velocity.is_some(),
            Segment::UserPosition => self.position.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes().is_empty()
    }

    /// Flatten into codes + floats in wire order
    pub fn pack(&self) -> UserStatePayload {
        let codes = self.codes();
        let mut floats = Vec::with_capacity(codes.float_count());

        for pose in [&self.avatar, &self.left_hand, &self.right_hand]
            .into_iter()
            .flatten()
        {
            pose.write(&mut floats);
        }
        for v in [&self.velocity, &self.position].into_iter().flatten() {
            floats.extend_from_slice(&v.to_array());
        }

        UserStatePayload::new(codes, floats)
    }

    /// Rebuild from floats already checked to match `codes` exactly
    pub(crate) fn from_segments(codes: MessageCodes, floats: &[f32]) -> Self {
        let mut state = UserState::new();
        let mut offset = 0;

        for segment in codes.segments() {
            let chunk = &floats[offset..offset + segment.float_count()];
            offset += segment.float_count();

            match segment {
                Segment::Avatar => state.avatar = Some(Pose::read(chunk)),
                Segment::LeftHand => state.left_hand = Some(Pose::read(chunk)),
                Segment::RightHand => state.right_hand = Some(Pose::read(chunk)),
                Segment::UserVelocity => {
                    state.velocity = Some(Vec3::new(chunk[0], chunk[1], chunk[2]))
                }
                Segment::UserPosition => {
                    state.position = Some(Vec3::new(chunk[0], chunk[1], chunk[2]))
                }
            }
        }

        state
    }
}
