//! Atomic writer for the .bson metadata pack.

use std::io::Write;
use std::path::Path;

use crate::types::ExportResult;

/// Writer for BSON pack files.
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Replace the file at `path` with `bytes`.
    ///
    /// The bytes go to a temp file in the same directory, which is synced and
    /// then renamed over `path`. Readers see either the old pack or the new
    /// one. The parent directory must already exist.
    pub fn write_to_file(bytes: &[u8], path: &Path) -> ExportResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropping the temp file on an early return removes it.
        let mut tmp = tempfile::Builder::new()
            .prefix(".metadata-pack-")
            .suffix(".tmp")
            .tempfile_in(dir)?;

        // Temp files start out 0600; the pack is read by other containers.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))?;
        }

        Self::write_to(bytes, &mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        sync_dir(dir)?;

        tracing::info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Write the encoded pack to any writer.
    pub fn write_to<W: Write>(bytes: &[u8], writer: &mut W) -> ExportResult<()> {
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Flush the directory entry so the rename survives a power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count()
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buf = Vec::new();
        ArtifactWriter::write_to(&[5, 0, 0, 0, 0], &mut buf).unwrap();
        assert_eq!(buf, [5, 0, 0, 0, 0]);
    }

    #[test]
    fn test_file_write_creates_pack() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foodmart-metadata.bson");

        ArtifactWriter::write_to_file(b"first", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
        assert_eq!(leftover_temp_files(dir.path()), 0);
    }

    #[test]
    fn test_sync_dir() {
        let dir = tempfile::tempdir().unwrap();
        sync_dir(dir.path()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_sync_dir_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sync_dir(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn test_file_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foodmart-metadata.bson");
        std::fs::write(&path, b"a much longer previous pack").unwrap();

        ArtifactWriter::write_to_file(b"new", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-mount").join("foodmart-metadata.bson");

        let err = ArtifactWriter::write_to_file(b"data", &path).unwrap_err();
        assert!(matches!(err, crate::ExportError::Io(_)));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_pack_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foodmart-metadata.bson");
        ArtifactWriter::write_to_file(b"data", &path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
