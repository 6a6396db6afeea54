//! Hard link detection for protecting linked duplicates.
//!
//! # Overview
//!
//! Hard links are multiple directory entries pointing to the same inode on
//! disk. Deleting one of them frees no space, so the remover asks this module
//! whether the kept file and a discard candidate are the same entry before
//! doing anything.
//!
//! # Platform Support
//!
//! - **Unix**: Uses (device_id, inode) pairs from file metadata
//! - **Other**: Detection disabled; no two paths are reported as the same file
//!
//! # Example
//!
//! ```no_run
//! use twintrim::scanner::hardlink::same_file;
//! use std::path::Path;
//!
//! if same_file(Path::new("a.txt"), Path::new("b.txt")).unwrap() {
//!     println!("a.txt and b.txt are the same file");
//! }
//! ```

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Platform-specific identity of an on-disk file.
///
/// On Unix, this is (device_id, inode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
    #[cfg(not(unix))]
    _phantom: (),
}

impl FileIdentity {
    /// Create an identity from file metadata.
    ///
    /// Returns `None` if the platform doesn't support inode tracking.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }

    /// Identity of the file at `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from reading metadata.
    pub fn of(path: &Path) -> io::Result<Option<Self>> {
        Ok(Self::from_metadata(&fs::metadata(path)?))
    }

    /// Check if identity detection is supported on this platform.
    #[must_use]
    pub const fn is_supported() -> bool {
        cfg!(unix)
    }
}

/// Check whether two paths name the same underlying file.
///
/// Always `false` on platforms without identity support.
///
/// # Errors
///
/// Returns the I/O error if either path cannot be stat'ed.
pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    let left = FileIdentity::of(a)?;
    let right = FileIdentity::of(b)?;
    Ok(matches!((left, right), (Some(l), Some(r)) if l == r))
}
