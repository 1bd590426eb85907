//! XRSYNC Upload - Asset import from user-selected files
//!
//! - File type tables (image, model, project archive)
//! - Asset library seam
//! - Upload handler: one active file listener at a time, and a batch
//!   that completes once every import in it has finished

pub mod file_types;
pub mod handler;
pub mod library;

pub use file_types::*;
pub use handler::*;
pub use library::*;
