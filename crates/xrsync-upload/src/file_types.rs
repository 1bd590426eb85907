//! Supported upload file types

/// Image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Model extensions
pub const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf"];

/// Project archive extension
pub const PROJECT_EXTENSION: &str = "zip";

/// Library asset type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetType {
    Image,
    Model,
}

/// What an uploaded file is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Asset(AssetType),
    Project,
}

/// Lower-cased text after the last `.`, if any
pub fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Classify a file by name
pub fn classify(name: &str) -> Option<FileKind> {
    let ext = extension(name)?;
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(FileKind::Asset(AssetType::Image))
    } else if MODEL_EXTENSIONS.contains(&ext.as_str()) {
        Some(FileKind::Asset(AssetType::Model))
    } else if ext == PROJECT_EXTENSION {
        Some(FileKind::Project)
    } else {
        None
    }
}

/// File picker filter for asset uploads
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetFilter {
    Image,
    Model,
    #[default]
    Any,
}

impl AssetFilter {
    /// Accept string handed to the file picker
    pub fn accept(self) -> &'static str {
        match self {
            AssetFilter::Image => "image/*",
            AssetFilter::Model => ".glb",
            AssetFilter::Any => "",
        }
    }
}
