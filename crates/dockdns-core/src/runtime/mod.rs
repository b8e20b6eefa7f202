//! Runtime client implementations
//!
//! - [`SnapshotFileClient`]: Container and service listings from a JSON file

pub mod file;

pub use file::{SnapshotFile, SnapshotFileClient};
