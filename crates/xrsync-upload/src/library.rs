//! Asset library seam

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use xrsync_core::{XrsyncError, XrsyncResult};

use crate::AssetType;

/// Library asset identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AssetId(pub u64);

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({:016x})", self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A file picked by the user
#[derive(Clone, Debug, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Where uploaded assets are imported
pub trait AssetLibrary: Send + Sync + 'static {
    fn add_new_asset(
        &self,
        file: UploadFile,
        asset_type: AssetType,
    ) -> impl Future<Output = XrsyncResult<AssetId>> + Send;
}

/// Stored asset record
#[derive(Clone, Debug)]
pub struct StoredAsset {
    pub id: AssetId,
    pub name: String,
    pub asset_type: AssetType,
    pub size: usize,
}

/// In-process library, optionally with a simulated import delay
#[derive(Debug, Default)]
pub struct InMemoryLibrary {
    assets: Mutex<Vec<StoredAsset>>,
    next_id: AtomicU64,
    import_delay: Duration,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_import_delay(import_delay: Duration) -> Self {
        Self {
            import_delay,
            ..Self::default()
        }
    }

    pub fn assets(&self) -> Vec<StoredAsset> {
        self.assets.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.assets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.lock().is_empty()
    }
}

impl AssetLibrary for InMemoryLibrary {
    async fn add_new_asset(&self, file: UploadFile, asset_type: AssetType) -> XrsyncResult<AssetId> {
        if file.data.is_empty() {
            return Err(XrsyncError::AssetImport(format!("{} is empty", file.name)));
        }
        if !self.import_delay.is_zero() {
            tokio::time::sleep(self.import_delay).await;
        }

        let id = AssetId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.assets.lock().push(StoredAsset {
            id,
            name: file.name,
            asset_type,
            size: file.data.len(),
        });
        Ok(id)
    }
}
