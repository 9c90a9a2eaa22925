//! Entries read out of an archive

/// What the walker managed to read for an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// Raw bytes, not yet decoded
    Loaded(Vec<u8>),
    /// Entry exceeds the per-file limit and was not read
    TooLarge { size: u64, limit: u64 },
    /// Reading the entry failed
    Unreadable(String),
}

/// One file from an archive or directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Archive-relative path using `/` separators
    pub path: String,
    pub contents: Contents,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Loaded(bytes),
        }
    }

    /// Build an entry from text already in memory
    pub fn from_text(path: impl Into<String>, text: &str) -> Self {
        Self::new(path, text.as_bytes().to_vec())
    }
}

/// Whether a path might hold source code.
///
/// Deliberately permissive: any path containing `.<ext>` anywhere (so
/// `file.php.bak` and `dir.php/readme` qualify) or containing no dot at all.
pub fn is_source_path(path: &str, extensions: &[String]) -> bool {
    if !path.contains('.') {
        return true;
    }

    extensions.iter().any(|ext| {
        let dotted = format!(".{}", ext.trim_start_matches('.'));
        path.ends_with(&dotted) || path.contains(&dotted)
    })
}
