//! XRSYNC Test Harness - Link simulation and end-to-end sessions
//!
//! This crate provides:
//! - A seeded lossy link (loss, burst loss, latency in frames)
//! - A two-peer session simulator driving a real controller and remote user
//! - End-to-end integration tests

pub mod link;
pub mod session;

#[cfg(test)]
mod integration;

pub use link::*;
pub use session::*;
