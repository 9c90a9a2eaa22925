//! Hook records produced by the extraction pipeline

use super::content_hash;
use super::resolver::EnclosingFunction;
use serde::{Deserialize, Serialize};

/// Placeholder shown when a call has no enclosing named function
pub const NOT_FOUND: &str = "Function definition not found";

/// One declared hook that is not in the reference set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookRecord {
    /// Stable identifier derived from file, offset and hook name
    pub id: String,
    /// Literal first argument of the call
    pub hook_name: String,
    /// Call name that declared the hook
    pub callee: String,
    /// Full call expression from the sanitized text
    pub call_text: String,
    /// Archive-relative path
    pub source_file: String,
    /// 1-based line of the call within the sanitized text
    pub line_number: usize,
    /// Byte offset of the call within the sanitized text
    pub offset: usize,
    /// Enclosing named function, if one was found
    pub function: Option<EnclosingFunction>,
}

impl HookRecord {
    pub fn new(
        source_file: &str,
        callee: &str,
        hook_name: &str,
        call_text: &str,
        offset: usize,
        line_number: usize,
        function: Option<EnclosingFunction>,
    ) -> Self {
        let id = content_hash(&format!("{}:{}:{}", source_file, offset, hook_name))[..12].to_string();

        Self {
            id,
            hook_name: hook_name.to_string(),
            callee: callee.to_string(),
            call_text: call_text.to_string(),
            source_file: source_file.to_string(),
            line_number,
            offset,
            function,
        }
    }

    pub fn function_name(&self) -> &str {
        self.function.as_ref().map_or(NOT_FOUND, |f| f.name.as_str())
    }

    /// Trimmed inner body of the enclosing function
    pub fn function_body(&self) -> &str {
        self.function.as_ref().map_or(NOT_FOUND, |f| f.body.as_str())
    }

    /// Full enclosing definition, signature included
    pub fn function_definition(&self) -> &str {
        self.function.as_ref().map_or(NOT_FOUND, |f| f.definition.as_str())
    }

    /// Case-insensitive match against hook name, function name, file and call text
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }

        let needle = term.to_lowercase();
        [
            self.hook_name.as_str(),
            self.function_name(),
            self.source_file.as_str(),
            self.call_text.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// A sample call a third party could use to hook in.
    ///
    /// Passes the enclosing function's first parameter, falling back to the
    /// given default parameters and then to a generic `$value`.
    pub fn usage_example(&self, default_params: Option<&[String]>) -> String {
        let first_param = self
            .function
            .as_ref()
            .and_then(|f| f.param_names().first().map(|p| p.to_string()))
            .or_else(|| default_params.and_then(|p| p.first().cloned()))
            .unwrap_or_else(|| "$value".to_string());

        format!("{}('{}', {})", self.callee, self.hook_name, first_param)
    }
}
