//! HookFinder - custom filter hook discovery for plugin packages
//!
//! This library reads a plugin archive, finds every hook the plugin declares
//! through a declaring call such as `apply_filters`, and reports the ones
//! that are not part of a known reference set, together with the function
//! each declaration sits in.

pub mod cli;
pub mod error;
pub mod extract;
pub mod reference;
pub mod source;

/// Re-export commonly used types
pub use error::{HookError, Result};
pub use extract::{EnclosingFunction, ExtractionPipeline, ExtractionReport, HookRecord};
pub use reference::ReferenceHookSet;
pub use source::{ScanConfig, SourceArchive, SourceFile};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "hookfinder";
