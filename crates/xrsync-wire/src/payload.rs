//! Packed user state message
//!
//! Wire layout:
//! - Byte 0: message codes
//! - Bytes 1..: segment floats (f32 LE)

use bytes::{Buf, BufMut, Bytes, BytesMut};
use xrsync_core::{XrsyncError, XrsyncResult};

use crate::{MessageCodes, UserState};

/// Size of the code buffer
pub const CODE_SIZE: usize = 1;

/// Size of one wire float
pub const FLOAT_SIZE: usize = 4;

/// Largest possible message (every segment present)
pub const MAX_PAYLOAD_SIZE: usize = CODE_SIZE + 21 * FLOAT_SIZE;

/// Codes + floats, as produced by the encoder for one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserStatePayload {
    codes: MessageCodes,
    floats: Vec<f32>,
}

impl UserStatePayload {
    pub fn new(codes: MessageCodes, floats: Vec<f32>) -> Self {
        Self { codes, floats }
    }

    #[inline]
    pub fn codes(&self) -> MessageCodes {
        self.codes
    }

    #[inline]
    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    /// Nothing to send this frame
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// First buffer: the code byte
    pub fn code_buffer(&self) -> Bytes {
        Bytes::copy_from_slice(&[self.codes.bits()])
    }

    /// Second buffer: the floats, little-endian
    pub fn float_buffer(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.floats.len() * FLOAT_SIZE);
        for &f in &self.floats {
            buf.put_f32_le(f);
        }
        buf.freeze()
    }

    /// Both buffers concatenated
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        buf.put_u8(self.codes.bits());
        for &f in &self.floats {
            buf.put_f32_le(f);
        }
        buf.freeze()
    }

    #[inline]
    pub fn wire_size(&self) -> usize {
        CODE_SIZE + self.floats.len() * FLOAT_SIZE
    }

    /// Parse the two-buffer form
    pub fn from_buffers(code_buf: &[u8], float_buf: &[u8]) -> XrsyncResult<Self> {
        if code_buf.len() != CODE_SIZE {
            return Err(XrsyncError::InvalidWireFormat(format!(
                "Code buffer must be {} byte, got {}",
                CODE_SIZE,
                code_buf.len()
            )));
        }
        Self::decode_floats(MessageCodes::new(code_buf[0]), float_buf)
    }

    /// Parse the concatenated form
    pub fn parse(buf: &[u8]) -> XrsyncResult<Self> {
        if buf.len() < CODE_SIZE {
            return Err(XrsyncError::BufferTooShort {
                expected: CODE_SIZE,
                actual: buf.len(),
            });
        }
        Self::decode_floats(MessageCodes::new(buf[0]), &buf[CODE_SIZE..])
    }

    fn decode_floats(codes: MessageCodes, mut float_buf: &[u8]) -> XrsyncResult<Self> {
        if codes.has_reserved_bits() {
            return Err(XrsyncError::UnknownMessageCodes(codes.bits()));
        }

        if float_buf.len() % FLOAT_SIZE != 0 {
            return Err(XrsyncError::InvalidWireFormat(format!(
                "Float buffer length {} is not a multiple of {}",
                float_buf.len(),
                FLOAT_SIZE
            )));
        }

        let expected = codes.float_count();
        let actual = float_buf.len() / FLOAT_SIZE;
        if actual < expected {
            return Err(XrsyncError::BufferTooShort {
                expected: expected * FLOAT_SIZE,
                actual: float_buf.len(),
            });
        }
        if actual > expected {
            return Err(XrsyncError::TrailingData { expected, actual });
        }

        let mut floats = Vec::with_capacity(actual);
        while float_buf.has_remaining() {
            floats.push(float_buf.get_f32_le());
        }

        Ok(UserStatePayload { codes, floats })
    }

    /// Split back into segments
    pub fn unpack(&self) -> XrsyncResult<UserState> {
        if self.codes.has_reserved_bits() {
            return Err(XrsyncError::UnknownMessageCodes(self.codes.bits()));
        }

        let expected = self.codes.float_count();
        let actual = self.floats.len();
        if actual < expected {
            return Err(XrsyncError::BufferTooShort {
                expected: expected * FLOAT_SIZE,
                actual: actual * FLOAT_SIZE,
            });
        }
        if actual > expected {
            return Err(XrsyncError::TrailingData { expected, actual });
        }

        Ok(UserState::from_segments(self.codes, &self.floats))
    }
}

/// Decode a concatenated message straight into user state
pub fn decode_user_state(buf: &[u8]) -> XrsyncResult<UserState> {
    UserStatePayload::parse(buf)?.unpack()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pose, Segment};
    use proptest::prelude::*;
    use xrsync_core::Vec3;

    fn full_state() -> UserState {
        UserState {
            avatar: Some(Pose::new(Vec3::new(0.0, 1.6, 0.0), [0.1, -0.2])),
            left_hand: Some(Pose::new(Vec3::new(-0.3, 1.1, -0.2), [0.5, 0.6])),
            right_hand: Some(Pose::new(Vec3::new(0.3, 1.1, -0.2), [-0.5, 0.6])),
            velocity: Some(Vec3::new(0.0, 0.0, -1.5)),
            position: Some(Vec3::new(10.0, 0.0, -4.0)),
        }
    }

    #[test]
    fn test_wire_layout() {
        let payload = UserStatePayload::new(
            MessageCodes::new(MessageCodes::USER_VELOCITY),
            vec![1.0, -2.0, 0.5],
        );

        let bytes = payload.to_bytes();
        assert_eq!(bytes.len(), 13);
        assert_eq!(bytes[0], MessageCodes::USER_VELOCITY);
        assert_eq!(&bytes[1..5], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[5..9], &(-2.0f32).to_le_bytes());

        assert_eq!(payload.code_buffer().as_ref(), &[MessageCodes::USER_VELOCITY]);
        assert_eq!(payload.float_buffer().len(), 12);
        assert_eq!(&bytes[1..], payload.float_buffer().as_ref());
    }

    #[test]
    fn test_full_message_roundtrip() {
        let state = full_state();
        let bytes = state.pack().to_bytes();

        assert_eq!(bytes.len(), MAX_PAYLOAD_SIZE);
        assert_eq!(decode_user_state(&bytes).unwrap(), state);
    }

    #[test]
    fn test_two_buffer_form() {
        let payload = full_state().pack();
        let parsed =
            UserStatePayload::from_buffers(&payload.code_buffer(), &payload.float_buffer())
                .unwrap();
        assert_eq!(parsed, payload);

        assert!(matches!(
            UserStatePayload::from_buffers(&[], &payload.float_buffer()),
            Err(XrsyncError::InvalidWireFormat(_))
        ));
    }

    #[test]
    fn test_empty_message() {
        let payload = UserStatePayload::parse(&[0]).unwrap();
        assert!(payload.is_empty());
        assert_eq!(payload.unpack().unwrap(), UserState::new());

        assert_eq!(
            UserStatePayload::parse(&[]),
            Err(XrsyncError::BufferTooShort {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_rejects_reserved_bits() {
        assert_eq!(
            UserStatePayload::parse(&[0x20]),
            Err(XrsyncError::UnknownMessageCodes(0x20))
        );
    }

    #[test]
    fn test_rejects_short_and_long_buffers() {
        let mut bytes = full_state().pack().to_bytes().to_vec();

        // Missing the last float of USER_POSITION
        let short = &bytes[..bytes.len() - FLOAT_SIZE];
        assert!(matches!(
            UserStatePayload::parse(short),
            Err(XrsyncError::BufferTooShort { .. })
        ));

        // One float too many
        bytes.extend_from_slice(&0.0f32.to_le_bytes());
        assert_eq!(
            UserStatePayload::parse(&bytes),
            Err(XrsyncError::TrailingData {
                expected: 21,
                actual: 22
            })
        );

        // Torn float
        let torn = &bytes[..bytes.len() - 2];
        assert!(matches!(
            UserStatePayload::parse(torn),
            Err(XrsyncError::InvalidWireFormat(_))
        ));
    }

    proptest! {
        #[test]
        fn any_code_byte_decodes_its_own_layout(bits in 0u8..0x20) {
            let codes = MessageCodes::new(bits);
            let floats: Vec<f32> = (0..codes.float_count()).map(|i| i as f32).collect();
            let bytes = UserStatePayload::new(codes, floats).to_bytes();

            let state = decode_user_state(&bytes).unwrap();
            prop_assert_eq!(state.codes(), codes);
            for segment in Segment::ORDER {
                prop_assert_eq!(state.has(segment), codes.contains(segment));
            }
        }
    }
}
