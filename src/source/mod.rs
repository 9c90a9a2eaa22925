//! Archive ingestion
//!
//! This module turns a plugin package into an ordered list of entries:
//! - `.zip` archives are read entry by entry in central-directory order
//! - Unpacked directories are walked in sorted path order
//!
//! The archive size ceiling is enforced here twice: against the container's
//! size when it is opened, and against the running total of decoded entry
//! bytes while it is read, so a small zip cannot inflate past the ceiling.

mod config;
mod entry;

pub use config::{user_config_path, ScanConfig, CONFIG_FILE};
pub use entry::{is_source_path, Contents, SourceFile};

use crate::error::{HookError, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Kind of container being analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Directory,
}

/// A plugin package opened for reading
#[derive(Debug)]
pub struct SourceArchive {
    path: PathBuf,
    kind: ArchiveKind,
    max_archive_bytes: u64,
    max_file_bytes: u64,
}

impl SourceArchive {
    /// Open a zip file or directory, checking the archive size ceiling
    pub fn open<P: AsRef<Path>>(path: P, config: &ScanConfig) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .map_err(|e| HookError::Archive(format!("cannot open {}: {}", path.display(), e)))?;

        let (kind, size) = if metadata.is_dir() {
            (ArchiveKind::Directory, directory_size(path))
        } else {
            (ArchiveKind::Zip, metadata.len())
        };

        if size > config.max_archive_bytes {
            return Err(HookError::ArchiveTooLarge {
                size,
                limit: config.max_archive_bytes,
            });
        }

        debug!("Opened {:?} archive {:?} ({} bytes)", kind, path, size);

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            max_archive_bytes: config.max_archive_bytes,
            max_file_bytes: config.max_file_bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ArchiveKind {
        self.kind
    }

    /// Display name for reports
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Read every file entry.
    ///
    /// Fails when the container itself is unreadable or when the decoded
    /// entries add up to more than the archive ceiling. Individual entries
    /// that cannot be read come back as [`Contents::Unreadable`].
    pub fn files(&self) -> Result<Vec<SourceFile>> {
        match self.kind {
            ArchiveKind::Zip => self.read_zip(),
            ArchiveKind::Directory => self.read_directory(),
        }
    }

    fn check_decoded(&self, total: u64) -> Result<()> {
        if total > self.max_archive_bytes {
            return Err(HookError::ArchiveTooLarge {
                size: total,
                limit: self.max_archive_bytes,
            });
        }
        Ok(())
    }

    /// Read one entry, charging its bytes against the running `decoded` total
    fn load_entry<R: Read>(&self, reader: &mut R, size: u64, decoded: &mut u64) -> Result<Contents> {
        if size > self.max_file_bytes {
            return Ok(Contents::TooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }

        self.check_decoded(*decoded + size)?;
        let contents = read_limited(reader, self.max_file_bytes);
        if let Contents::Loaded(buf) = &contents {
            *decoded += buf.len() as u64;
            self.check_decoded(*decoded)?;
        }
        Ok(contents)
    }

    fn read_zip(&self) -> Result<Vec<SourceFile>> {
        let file = File::open(&self.path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| HookError::Archive(format!("{}: {}", self.path.display(), e)))?;

        let mut files = Vec::with_capacity(archive.len());
        let mut decoded = 0u64;

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    files.push(SourceFile {
                        path: format!("#{}", index),
                        contents: Contents::Unreadable(e.to_string()),
                    });
                    continue;
                }
            };

            if entry.is_dir() {
                continue;
            }

            let path = entry.name().to_string();
            let size = entry.size();
            let contents = self.load_entry(&mut entry, size, &mut decoded)?;

            files.push(SourceFile { path, contents });
        }

        Ok(files)
    }

    fn read_directory(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        let mut decoded = 0u64;

        for entry in WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = entry
                .path()
                .strip_prefix(&self.path)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let contents = match File::open(entry.path()) {
                Ok(mut file) => self.load_entry(&mut file, size, &mut decoded)?,
                Err(e) => Contents::Unreadable(e.to_string()),
            };

            files.push(SourceFile {
                path: relative,
                contents,
            });
        }

        Ok(files)
    }
}

/// Read at most `limit` bytes; declared sizes can lie, so the cap is
/// enforced on the actual stream as well
fn read_limited<R: Read>(reader: &mut R, limit: u64) -> Contents {
    let mut buf = Vec::new();
    match reader.take(limit + 1).read_to_end(&mut buf) {
        Ok(read) if read as u64 > limit => Contents::TooLarge {
            size: read as u64,
            limit,
        },
        Ok(_) => Contents::Loaded(buf),
        Err(e) => Contents::Unreadable(e.to_string()),
    }
}

fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
