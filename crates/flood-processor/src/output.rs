//! Atomic output publishing.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/// Write `bytes` to `path` so that readers see either the old file or the
/// complete new one, never a partial write.
///
/// The data goes to a temporary file in the same directory, is synced, and
/// is then renamed over `path`. On failure the temporary file is removed.
pub fn publish_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "Published file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("flood_mask.png");

        publish_atomic(&target, b"first").unwrap();
        publish_atomic(&target, b"second").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"second");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_directory_fails_without_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.png");
        assert!(publish_atomic(&target, b"data").is_err());
        assert!(!target.exists());
    }
}
