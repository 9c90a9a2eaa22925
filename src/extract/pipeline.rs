//! Extraction pipeline
//!
//! Per file: applicability check, sanitize, scan for declaring calls,
//! resolve the enclosing function, drop known hooks, emit records.
//! Records come out in file order, then offset order within a file.
//!
//! Cancellation through [`CancelToken`] is a hook for callers embedding the
//! library. The `hookfinder` binary never installs one and always runs to
//! completion.

use super::lexer::line_number;
use super::record::HookRecord;
use super::resolver::resolve;
use super::sanitize::sanitize;
use super::scanner::CallScanner;
use crate::error::{HookError, Result};
use crate::reference::ReferenceHookSet;
use crate::source::{is_source_path, Contents, ScanConfig, SourceArchive, SourceFile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cooperative cancellation, checked between files
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a file was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Contents are not valid UTF-8 text
    Decode { message: String },
    /// Contents exceed the per-file limit
    TooLarge { size: u64, limit: u64 },
    /// The entry could not be read from the archive
    Unreadable { message: String },
    /// The run was cancelled before this file
    Cancelled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Decode { message } => write!(f, "not valid text: {}", message),
            SkipReason::TooLarge { size, limit } => {
                write!(f, "{} bytes exceeds the {} byte limit", size, limit)
            }
            SkipReason::Unreadable { message } => write!(f, "unreadable: {}", message),
            SkipReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A source file that was not scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Entries handed to the pipeline
    pub files_seen: usize,
    /// Entries rejected as non-source
    pub files_rejected: usize,
    /// Source entries that were sanitized and scanned
    pub files_processed: usize,
    /// Declaring calls with a literal hook name
    pub hooks_found: usize,
    /// Of those, hooks dropped because they are already known
    pub known_filtered: usize,
}

impl ScanStats {
    /// Entries that passed the applicability check
    pub fn files_applicable(&self) -> usize {
        self.files_seen - self.files_rejected
    }
}

/// Result of running the pipeline over a batch of files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub records: Vec<HookRecord>,
    pub skipped: Vec<SkippedFile>,
    pub stats: ScanStats,
}

/// Records and counts for a single file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    pub records: Vec<HookRecord>,
    pub hooks_found: usize,
    pub known_filtered: usize,
}

/// Drives sanitize, scan and resolve over archive entries
pub struct ExtractionPipeline<'a> {
    known: &'a ReferenceHookSet,
    scanners: Vec<CallScanner>,
    extensions: Vec<String>,
    max_file_bytes: u64,
    cancel: Option<CancelToken>,
}

impl<'a> ExtractionPipeline<'a> {
    /// Create a pipeline filtering against `known`
    pub fn new(config: &ScanConfig, known: &'a ReferenceHookSet) -> Self {
        Self {
            known,
            scanners: config
                .callees
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(CallScanner::new)
                .collect(),
            extensions: config.source_extensions.clone(),
            max_file_bytes: config.max_file_bytes,
            cancel: None,
        }
    }

    /// Check `token` before every file. Files reached after cancellation are
    /// reported as [`SkipReason::Cancelled`].
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Read an archive and extract from all of its entries.
    ///
    /// Fails when the archive cannot be read or holds no source files.
    pub fn run(&self, archive: &SourceArchive) -> Result<ExtractionReport> {
        let files = archive.files()?;
        let report = self.extract_all(files);

        if report.stats.files_applicable() == 0 {
            return Err(HookError::NoSourceFiles);
        }

        Ok(report)
    }

    /// Extract records from a batch of files. Never fails; problem files are
    /// listed in [`ExtractionReport::skipped`].
    pub fn extract_all<I>(&self, files: I) -> ExtractionReport
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let mut report = ExtractionReport::default();

        for file in files {
            report.stats.files_seen += 1;

            if !is_source_path(&file.path, &self.extensions) {
                report.stats.files_rejected += 1;
                continue;
            }

            if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                report.skipped.push(SkippedFile {
                    path: file.path,
                    reason: SkipReason::Cancelled,
                });
                continue;
            }

            let text = match self.decode(file.contents) {
                Ok(text) => text,
                Err(reason) => {
                    warn!("Skipping {}: {}", file.path, reason);
                    report.skipped.push(SkippedFile {
                        path: file.path,
                        reason,
                    });
                    continue;
                }
            };

            let scan = self.extract_file(&file.path, &text);
            debug!(
                "Scanned {}: {} hooks, {} known",
                file.path, scan.hooks_found, scan.known_filtered
            );

            report.stats.files_processed += 1;
            report.stats.hooks_found += scan.hooks_found;
            report.stats.known_filtered += scan.known_filtered;
            report.records.extend(scan.records);
        }

        info!(
            "Processed {} files, found {} hooks ({} skipped, {} known)",
            report.stats.files_processed,
            report.records.len(),
            report.skipped.len(),
            report.stats.known_filtered
        );

        report
    }

    /// Sanitize and scan one file's text
    pub fn extract_file(&self, path: &str, raw_text: &str) -> FileScan {
        let text = sanitize(raw_text);
        let mut scan = FileScan::default();

        let mut calls: Vec<_> = self
            .scanners
            .iter()
            .flat_map(|scanner| scanner.scan(&text).map(move |call| (scanner.callee(), call)))
            .collect();
        calls.sort_by_key(|(_, call)| call.start);

        // Overlapping callee names (`filters`, `apply_filters`) share one
        // paren; keep the earliest-starting match for each
        let mut seen = HashSet::new();
        calls.retain(|(_, call)| seen.insert(call.open));

        for (callee, call) in calls {
            scan.hooks_found += 1;

            if self.known.contains(call.literal) {
                scan.known_filtered += 1;
                continue;
            }

            scan.records.push(HookRecord::new(
                path,
                callee,
                call.literal,
                call.text,
                call.start,
                line_number(&text, call.start),
                resolve(&text, call.start),
            ));
        }

        scan
    }

    fn decode(&self, contents: Contents) -> std::result::Result<String, SkipReason> {
        match contents {
            Contents::Loaded(bytes) if bytes.len() as u64 > self.max_file_bytes => {
                Err(SkipReason::TooLarge {
                    size: bytes.len() as u64,
                    limit: self.max_file_bytes,
                })
            }
            Contents::Loaded(bytes) => String::from_utf8(bytes).map_err(|e| SkipReason::Decode {
                message: e.utf8_error().to_string(),
            }),
            Contents::TooLarge { size, limit } => Err(SkipReason::TooLarge { size, limit }),
            Contents::Unreadable(message) => Err(SkipReason::Unreadable { message }),
        }
    }
}
