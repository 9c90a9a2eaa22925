//! Hook extraction engine
//!
//! This module finds custom hook declarations in plugin source text:
//! - Sanitizing embedded scripts and eval-like calls
//! - Scanning for declaring calls with a literal hook name
//! - Resolving the enclosing function by brace balancing
//! - Filtering against the known hook set
//!
//! The scanner does not look at comments when finding calls, so a declaring
//! call that has been commented out is still reported. Comments are only
//! skipped while balancing parentheses and braces.

mod lexer;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod sanitize;
pub mod scanner;

pub use lexer::line_number;
pub use pipeline::{
    CancelToken, ExtractionPipeline, ExtractionReport, FileScan, ScanStats, SkipReason,
    SkippedFile,
};
pub use record::{HookRecord, NOT_FOUND};
pub use resolver::{resolve, EnclosingFunction};
pub use sanitize::sanitize;
pub use scanner::{CallMatch, CallScanner};

use sha2::{Digest, Sha256};

/// Compute a stable hash for content
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
