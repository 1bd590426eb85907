//! Upload handler
//!
//! Only one file listener may be active at a time. An asset batch imports
//! every supported file concurrently and completes once, after the last
//! import has finished.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use xrsync_core::{XrsyncError, XrsyncResult};

use crate::{classify, AssetFilter, AssetId, AssetLibrary, FileKind, UploadFile, PROJECT_EXTENSION};

/// Upload configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Imports running at once within a batch
    pub max_concurrent_imports: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_concurrent_imports: 8,
        }
    }
}

/// Active file listener
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Listener {
    Assets { filter: AssetFilter, multiple: bool },
    ProjectFile,
}

impl Listener {
    /// Accept string for the file picker
    pub fn accept(&self) -> &'static str {
        match self {
            Listener::Assets { filter, .. } => filter.accept(),
            Listener::ProjectFile => ".zip",
        }
    }

    pub fn multiple(&self) -> bool {
        matches!(self, Listener::Assets { multiple: true, .. })
    }
}

/// Result of handing picked files to the handler
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
    Assets(Vec<AssetId>),
    ProjectFile(Option<UploadFile>),
}

/// Upload handler
pub struct UploadHandler<L: AssetLibrary> {
    library: Arc<L>,
    listener: Mutex<Option<Listener>>,
    config: UploadConfig,
}

impl<L: AssetLibrary> UploadHandler<L> {
    pub fn new(library: Arc<L>) -> Self {
        Self::with_config(library, UploadConfig::default())
    }

    pub fn with_config(library: Arc<L>, config: UploadConfig) -> Self {
        Self {
            library,
            listener: Mutex::new(None),
            config,
        }
    }

    pub fn library(&self) -> &Arc<L> {
        &self.library
    }

    pub fn listener(&self) -> Option<Listener> {
        *self.listener.lock()
    }

    fn start(&self, listener: Listener) -> XrsyncResult<()> {
        let mut active = self.listener.lock();
        if active.is_some() {
            return Err(XrsyncError::ListenerInUse);
        }
        debug!(accept = listener.accept(), "file listener started");
        *active = Some(listener);
        Ok(())
    }

    pub fn listen_for_assets(&self, filter: AssetFilter, multiple: bool) -> XrsyncResult<()> {
        self.start(Listener::Assets { filter, multiple })
    }

    pub fn listen_for_project_file(&self) -> XrsyncResult<()> {
        self.start(Listener::ProjectFile)
    }

    pub fn stop_listening(&self) {
        self.listener.lock().take();
    }

    /// Hand files picked by the user to the active listener
    pub async fn receive(&self, mut files: Vec<UploadFile>) -> XrsyncResult<UploadOutcome> {
        let listener = self.listener().ok_or(XrsyncError::NoActiveListener)?;

        if !listener.multiple() && files.len() > 1 {
            debug!(dropped = files.len() - 1, "listener takes a single file");
            files.truncate(1);
        }

        match listener {
            Listener::Assets { .. } => Ok(UploadOutcome::Assets(self.upload_files(files).await)),
            Listener::ProjectFile => {
                let Some(file) = files.into_iter().next() else {
                    return Ok(UploadOutcome::ProjectFile(None));
                };
                if classify(&file.name) != Some(FileKind::Project) {
                    return Err(XrsyncError::UnsupportedFileType(format!(
                        "{} (expected .{})",
                        file.name, PROJECT_EXTENSION
                    )));
                }
                Ok(UploadOutcome::ProjectFile(Some(file)))
            }
        }
    }

    /// Import every supported file; returns ids in input order once all
    /// imports are done
    pub async fn upload_files(&self, files: Vec<UploadFile>) -> Vec<AssetId> {
        let limit = self.config.max_concurrent_imports.max(1);
        let mut in_flight = JoinSet::new();
        let mut imported = Vec::new();

        for (index, file) in files.into_iter().enumerate() {
            let asset_type = match classify(&file.name) {
                Some(FileKind::Asset(asset_type)) => asset_type,
                Some(FileKind::Project) | None => {
                    warn!(file = %file.name, "unsupported file type, skipping");
                    continue;
                }
            };

            if in_flight.len() >= limit {
                if let Some(done) = in_flight.join_next().await {
                    collect(done, &mut imported);
                }
            }

            let library = Arc::clone(&self.library);
            in_flight.spawn(async move {
                let name = file.name.clone();
                (index, name, library.add_new_asset(file, asset_type).await)
            });
        }

        while let Some(done) = in_flight.join_next().await {
            collect(done, &mut imported);
        }

        imported.sort_by_key(|(index, _)| *index);
        let ids: Vec<AssetId> = imported.into_iter().map(|(_, id)| id).collect();
        debug!(count = ids.len(), "upload batch complete");
        ids
    }
}

type ImportResult = (usize, String, XrsyncResult<AssetId>);

fn collect(
    done: Result<ImportResult, tokio::task::JoinError>,
    imported: &mut Vec<(usize, AssetId)>,
) {
    match done {
        Ok((index, _, Ok(id))) => imported.push((index, id)),
        Ok((_, name, Err(e))) => warn!(file = %name, error = %e, "asset import failed"),
        Err(e) => warn!(error = %e, "asset import task aborted"),
    }
}
