//! Filesystem abstraction for plan execution.
//!
//! Plans execute against the six-operation [`FileSystem`] contract rather
//! than any concrete backend. Paths are forward-slash separated, rooted at
//! `/`, and normalized by each backend before use. Two reference backends
//! ship with the crate:
//!
//! - [`MemoryFileSystem`]: a flat in-memory map, used by the test suites
//! - [`LocalFileSystem`]: POSIX-style local disk, sandboxed to a root path
//!
//! Move operations report drift (missing source, occupied destination) as
//! [`crate::error::CuratorError::Conflict`] so the engine can tell user
//! interference from genuine faults without inspecting error text.

use std::io::Read;

use jiff::Timestamp;

use crate::error::Result;

pub mod local;
pub mod memory;
pub mod paths;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;

/// Descriptor of a file or directory at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMeta {
    /// Base name of the entry
    pub name: String,
    /// Full normalized path of the entry
    pub path: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Size in bytes; zero for directories
    pub size: u64,
    /// Last-modification timestamp
    pub modified: Timestamp,
    /// Content fingerprint; identical for identical byte content, empty for
    /// directories and for content the backend cannot read
    pub hash: String,
    /// MIME label; `inode/directory` for directories
    pub mime_type: String,
}

/// Path-addressed hierarchical storage that plans execute against.
///
/// Backends may be reordered internally but every operation must behave as
/// if calls were applied sequentially in the order made.
pub trait FileSystem: Send + Sync {
    /// Lists the children of a directory, ordered by name.
    fn list(&self, path: &str) -> Result<Vec<FileMeta>>;

    /// Opens a file for reading. The stream is released when dropped.
    fn read(&self, path: &str) -> Result<Box<dyn Read + Send>>;

    /// Moves a file or directory. Missing source and occupied destination
    /// are conflicts; the destination parent must already exist.
    fn move_entry(&self, source: &str, destination: &str) -> Result<()>;

    /// Creates a directory, along with missing parents. Succeeds when the
    /// path already is a directory; fails when it exists as a file.
    fn create_dir(&self, path: &str) -> Result<()>;

    /// Deletes a file, or a directory with all of its descendants.
    fn delete(&self, path: &str) -> Result<()>;

    /// Reports whether a path exists. A missing path is `Ok(false)`; only
    /// genuine I/O trouble is an error.
    fn exists(&self, path: &str) -> Result<bool>;
}

/// MIME label reported for directories.
pub const DIRECTORY_MIME_TYPE: &str = "inode/directory";
