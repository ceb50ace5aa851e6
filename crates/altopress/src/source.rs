//! Byte-stream access to an archive root, ZIP or directory.
//!
//! An archive travels either as a ZIP file or as an unpacked directory
//! tree; everything above this module sees the same interface: a listing
//! of slash-separated relative entry names plus per-entry byte reads.
//! Remote sources (HTTP, blob storage) are external adapters and would
//! plug in as further variants here.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use altopress_core::AltoError;
use zip::ZipArchive;

/// Size and resolved name of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Slash-separated name relative to the archive root.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
}

#[derive(Debug)]
enum Inner {
    Directory(PathBuf),
    Zip {
        // zip reads require &mut; the lock scope is one entry read.
        archive: Mutex<ZipArchive<File>>,
        entries: Vec<EntryInfo>,
    },
}

/// Byte-stream source behind an [`Archive`](crate::Archive).
#[derive(Debug)]
pub struct Source {
    path: PathBuf,
    inner: Inner,
}

impl Source {
    /// Open an archive root: a `.zip` file or a directory.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::SourceNotFound`] if the path does not exist
    /// and [`AltoError::MalformedArchive`] if a `.zip` file cannot be
    /// read as a ZIP archive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AltoError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(AltoError::SourceNotFound(path.display().to_string()));
        }

        let inner = if path.is_file() {
            let file = File::open(&path)?;
            let mut archive = ZipArchive::new(file).map_err(|e| {
                AltoError::MalformedArchive(format!("{}: {e}", path.display()))
            })?;
            let mut entries = Vec::with_capacity(archive.len());
            for i in 0..archive.len() {
                let entry = archive.by_index(i).map_err(|e| {
                    AltoError::MalformedArchive(format!("{}: {e}", path.display()))
                })?;
                if !entry.is_dir() {
                    entries.push(EntryInfo {
                        name: entry.name().to_string(),
                        size: entry.size(),
                    });
                }
            }
            Inner::Zip {
                archive: Mutex::new(archive),
                entries,
            }
        } else {
            Inner::Directory(path.clone())
        };

        Ok(Self { path, inner })
    }

    /// The archive root as given to [`Source::open`].
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List every file entry, sorted by name for a deterministic walk.
    pub fn entries(&self) -> Result<Vec<EntryInfo>, AltoError> {
        let mut entries = match &self.inner {
            Inner::Zip { entries, .. } => entries.clone(),
            Inner::Directory(root) => {
                let mut collected = Vec::new();
                walk_dir(root, root, &mut collected)?;
                collected
            }
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Read one entry's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::SourceNotFound`] if no such entry exists.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, AltoError> {
        match &self.inner {
            Inner::Directory(root) => {
                let path = root.join(name);
                if !path.is_file() {
                    return Err(AltoError::SourceNotFound(path.display().to_string()));
                }
                Ok(std::fs::read(path)?)
            }
            Inner::Zip { archive, .. } => {
                let mut archive = archive.lock().map_err(|_| {
                    AltoError::Io(format!("{}: zip reader poisoned", self.path.display()))
                })?;
                let mut entry = archive.by_name(name).map_err(|_| {
                    AltoError::SourceNotFound(format!("{}!{name}", self.path.display()))
                })?;
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// Look up one entry's info without reading it.
    pub fn entry_info(&self, name: &str) -> Result<Option<EntryInfo>, AltoError> {
        match &self.inner {
            Inner::Zip { entries, .. } => {
                Ok(entries.iter().find(|e| e.name == name).cloned())
            }
            Inner::Directory(root) => {
                let path = root.join(name);
                match path.metadata() {
                    Ok(meta) if meta.is_file() => Ok(Some(EntryInfo {
                        name: name.to_string(),
                        size: meta.len(),
                    })),
                    _ => Ok(None),
                }
            }
        }
    }
}

fn walk_dir(root: &Path, dir: &Path, out: &mut Vec<EntryInfo>) -> Result<(), AltoError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(root, &path, out)?;
        } else {
            let meta = entry.metadata()?;
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push(EntryInfo {
                name: relative,
                size: meta.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("ALTO")).unwrap();
        std::fs::write(dir.path().join("0001_metadata.xml"), b"<mets/>").unwrap();
        std::fs::write(dir.path().join("ALTO/0001_000001.xml"), b"<alto/>").unwrap();
        dir
    }

    #[test]
    fn missing_path_is_source_not_found() {
        let err = Source::open("/definitely/not/here").unwrap_err();
        assert!(matches!(err, AltoError::SourceNotFound(_)));
    }

    #[test]
    fn directory_listing_is_relative_and_sorted() {
        let dir = fixture_dir();
        let source = Source::open(dir.path()).unwrap();
        let names: Vec<String> = source.entries().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["0001_metadata.xml", "ALTO/0001_000001.xml"]);
    }

    #[test]
    fn directory_read_round_trips() {
        let dir = fixture_dir();
        let source = Source::open(dir.path()).unwrap();
        assert_eq!(source.read("ALTO/0001_000001.xml").unwrap(), b"<alto/>");
    }

    #[test]
    fn directory_read_missing_entry() {
        let dir = fixture_dir();
        let source = Source::open(dir.path()).unwrap();
        let err = source.read("nope.xml").unwrap_err();
        assert!(matches!(err, AltoError::SourceNotFound(_)));
    }

    #[test]
    fn entry_info_reports_size() {
        let dir = fixture_dir();
        let source = Source::open(dir.path()).unwrap();
        let info = source.entry_info("0001_metadata.xml").unwrap().unwrap();
        assert_eq!(info.size, 7);
        assert!(source.entry_info("nope.xml").unwrap().is_none());
    }

    fn fixture_zip() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::with_suffix(".zip").unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("0001_mets.xml", options).unwrap();
        writer.write_all(b"<mets/>").unwrap();
        writer.start_file("0001_000001.xml", options).unwrap();
        writer.write_all(b"<alto/>").unwrap();
        writer.finish().unwrap();
        file
    }

    #[test]
    fn zip_listing_and_read() {
        let file = fixture_zip();
        let source = Source::open(file.path()).unwrap();
        let names: Vec<String> = source.entries().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["0001_000001.xml", "0001_mets.xml"]);
        assert_eq!(source.read("0001_mets.xml").unwrap(), b"<mets/>");
        let err = source.read("nope.xml").unwrap_err();
        assert!(matches!(err, AltoError::SourceNotFound(_)));
    }

    #[test]
    fn non_zip_file_is_malformed_archive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"plain text, not a zip").unwrap();
        let err = Source::open(file.path()).unwrap_err();
        assert!(matches!(err, AltoError::MalformedArchive(_)));
    }
}
