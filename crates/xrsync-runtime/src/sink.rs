//! Outgoing payload sinks

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use xrsync_core::{XrsyncError, XrsyncResult};
use xrsync_wire::UserStatePayload;

/// Destination for encoded user state
pub trait PayloadSink {
    fn send(&mut self, payload: &UserStatePayload) -> XrsyncResult<()>;
}

/// Collects payloads in memory
impl PayloadSink for Vec<UserStatePayload> {
    fn send(&mut self, payload: &UserStatePayload) -> XrsyncResult<()> {
        self.push(payload.clone());
        Ok(())
    }
}

/// Payload receiver channel
pub type PayloadReceiver = mpsc::Receiver<Bytes>;

/// Forwards wire bytes into a bounded channel without blocking the frame
pub struct ChannelSink {
    tx: mpsc::Sender<Bytes>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Bytes>) -> Self {
        Self { tx }
    }
}

impl PayloadSink for ChannelSink {
    fn send(&mut self, payload: &UserStatePayload) -> XrsyncResult<()> {
        self.tx.try_send(payload.to_bytes()).map_err(|e| match e {
            TrySendError::Full(_) => XrsyncError::TransportError("Payload channel full".into()),
            TrySendError::Closed(_) => {
                XrsyncError::TransportError("Payload channel closed".into())
            }
        })
    }
}

/// Create a bounded sink/receiver pair
pub fn payload_channel(capacity: usize) -> (ChannelSink, PayloadReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelSink::new(tx), rx)
}
