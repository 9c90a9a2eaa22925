//! Reference set of already-known hooks
//!
//! Hooks in this set are considered documented and are excluded from results.
//! The set is built once and only read afterwards.

mod builtin;

use crate::error::{HookError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Known hook names with their conventional parameter lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceHookSet {
    hooks: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    hooks: BTreeMap<String, Vec<String>>,
}

impl ReferenceHookSet {
    /// An empty set; nothing is filtered
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in core hook table, constructed on first use
    pub fn builtin() -> &'static ReferenceHookSet {
        static BUILTIN: OnceLock<ReferenceHookSet> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let hooks = builtin::CORE_HOOKS
                .iter()
                .map(|(name, params)| {
                    (
                        name.to_string(),
                        params.iter().map(|p| p.to_string()).collect(),
                    )
                })
                .collect();
            ReferenceHookSet { hooks }
        })
    }

    /// Build a set from bare names without parameter lists
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hooks: names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
        }
    }

    /// Load a reference file.
    ///
    /// `.toml` files carry a `[hooks]` table of name to parameter list; any
    /// other file is read as one hook name per line with `#` comments.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HookError::Reference(format!("failed to read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::parse_toml(&content)
                .map_err(|e| HookError::Reference(format!("{}: {}", path.display(), e)))
        } else {
            Ok(Self::parse_list(&content))
        }
    }

    pub fn parse_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: ReferenceFile = toml::from_str(content)?;
        Ok(Self { hooks: file.hooks })
    }

    pub fn parse_list(content: &str) -> Self {
        Self::from_names(
            content
                .lines()
                .map(|line| line.split('#').next().unwrap_or("").trim())
                .filter(|line| !line.is_empty()),
        )
    }

    /// Add every hook from `other`. Parameters already present are kept.
    pub fn extend_from(&mut self, other: &ReferenceHookSet) {
        for (name, params) in &other.hooks {
            self.hooks
                .entry(name.clone())
                .and_modify(|existing| {
                    if existing.is_empty() {
                        existing.clone_from(params);
                    }
                })
                .or_insert_with(|| params.clone());
        }
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    pub fn default_params(&self, name: &str) -> Option<&[String]> {
        self.hooks
            .get(name)
            .map(|p| p.as_slice())
            .filter(|p| !p.is_empty())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hooks in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.hooks.iter().map(|(n, p)| (n.as_str(), p.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_core_hooks() {
        let set = ReferenceHookSet::builtin();
        assert!(set.contains("the_content"));
        assert!(!set.contains("The_Content"));
        assert_eq!(set.default_params("the_content"), Some(&["$content".to_string()][..]));
        assert!(std::ptr::eq(set, ReferenceHookSet::builtin()));
    }

    #[test]
    fn test_parse_list() {
        let set = ReferenceHookSet::parse_list("# known hooks\nmy_hook\n\n  other_hook  # trailing\n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("my_hook"));
        assert!(set.contains("other_hook"));
        assert_eq!(set.default_params("my_hook"), None);
    }

    #[test]
    fn test_parse_toml() {
        let set = ReferenceHookSet::parse_toml(
            "[hooks]\nshop_price = [\"$price\", \"$product\"]\nshop_title = []\n",
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.default_params("shop_price").map(|p| p.len()), Some(2));
        assert!(ReferenceHookSet::parse_toml("hooks = 3").is_err());
    }

    #[test]
    fn test_extend_keeps_parameters() {
        let mut set = ReferenceHookSet::from_names(["the_content", "extra"]);
        set.extend_from(ReferenceHookSet::builtin());

        assert!(set.contains("extra"));
        assert!(set.contains("wp_title"));
        assert_eq!(set.default_params("the_content").map(|p| p[0].as_str()), Some("$content"));
    }

    #[test]
    fn test_load_text_and_toml_files() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("known.txt");
        let table = dir.path().join("known.toml");
        std::fs::write(&list, "alpha\nbeta\n").unwrap();
        std::fs::write(&table, "[hooks]\ngamma = [\"$g\"]\n").unwrap();

        assert_eq!(ReferenceHookSet::load(&list).unwrap().len(), 2);
        assert!(ReferenceHookSet::load(&table).unwrap().contains("gamma"));
        assert!(ReferenceHookSet::load(&dir.path().join("missing.txt")).is_err());
    }
}
