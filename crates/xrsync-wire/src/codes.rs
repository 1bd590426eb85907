//! Message codes for the user state wire format

use xrsync_core::Hand;

/// Message codes (1 byte)
///
/// Each optional segment owns one bit; presence is tested bit by bit so a
/// code byte always decomposes into exactly one segment set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MessageCodes(pub u8);

impl MessageCodes {
    pub const NONE: MessageCodes = MessageCodes(0);

    // Flag bits
    pub const AVATAR: u8 = 0b0000_0001;
    pub const LEFT_HAND: u8 = 0b0000_0010;
    pub const RIGHT_HAND: u8 = 0b0000_0100;
    pub const USER_VELOCITY: u8 = 0b0000_1000;
    pub const USER_POSITION: u8 = 0b0001_0000;

    /// Bits that must be zero on the wire
    pub const RESERVED: u8 = 0b1110_0000;

    #[inline]
    pub fn new(bits: u8) -> Self {
        MessageCodes(bits)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, segment: Segment) -> bool {
        self.0 & segment.code() != 0
    }

    #[inline]
    pub fn insert(&mut self, segment: Segment) {
        self.0 |= segment.code();
    }

    #[inline]
    pub fn remove(&mut self, segment: Segment) {
        self.0 &= !segment.code();
    }

    #[inline]
    pub fn has_reserved_bits(self) -> bool {
        self.0 & Self::RESERVED != 0
    }

    /// Present segments in wire order
    pub fn segments(self) -> impl Iterator<Item = Segment> {
        Segment::ORDER
            .into_iter()
            .filter(move |segment| self.contains(*segment))
    }

    /// Number of floats the float buffer must hold for these codes
    pub fn float_count(self) -> usize {
        self.segments().map(Segment::float_count).sum()
    }
}

impl From<u8> for MessageCodes {
    fn from(bits: u8) -> Self {
        MessageCodes(bits)
    }
}

impl From<MessageCodes> for u8 {
    fn from(codes: MessageCodes) -> Self {
        codes.0
    }
}

/// Optional segment of a user state message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Avatar,
    LeftHand,
    RightHand,
    UserVelocity,
    UserPosition,
}

impl Segment {
    /// Fixed emission order
    pub const ORDER: [Segment; 5] = [
        Segment::Avatar,
        Segment::LeftHand,
        Segment::RightHand,
        Segment::UserVelocity,
        Segment::UserPosition,
    ];

    /// Position (3) + truncated rotation (2)
    pub const POSE_FLOATS: usize = 5;
    pub const VECTOR_FLOATS: usize = 3;

    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Segment::Avatar => MessageCodes::AVATAR,
            Segment::LeftHand => MessageCodes::LEFT_HAND,
            Segment::RightHand => MessageCodes::RIGHT_HAND,
            Segment::UserVelocity => MessageCodes::USER_VELOCITY,
            Segment::UserPosition => MessageCodes::USER_POSITION,
        }
    }

    #[inline]
    pub fn float_count(self) -> usize {
        match self {
            Segment::Avatar | Segment::LeftHand | Segment::RightHand => Self::POSE_FLOATS,
            Segment::UserVelocity | Segment::UserPosition => Self::VECTOR_FLOATS,
        }
    }

    pub fn hand(hand: Hand) -> Segment {
        match hand {
            Hand::Left => Segment::LeftHand,
            Hand::Right => Segment::RightHand,
        }
    }
}
