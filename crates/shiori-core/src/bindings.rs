//! Remembered on-disk titles for library entries.
//!
//! A binding maps a library entry ID to the lowercase title its files carry
//! on disk. Once written it is never replaced, since a series keeps its file
//! naming for the rest of the season.

use std::collections::BTreeMap;

use crate::config::ConfigStore;

pub trait BindingStore {
    fn binding(&self, library_id: &str) -> Option<&str>;

    fn set_binding(&mut self, library_id: &str, title: String);

    /// Store `title` (lowercased) unless a binding already exists.
    ///
    /// Returns whether a new binding was written.
    fn remember(&mut self, library_id: &str, title: &str) -> bool {
        if self.binding(library_id).is_some() {
            return false;
        }
        let title = title.trim().to_lowercase();
        tracing::info!(library_id, title = %title, "remembering file binding");
        self.set_binding(library_id, title);
        true
    }
}

impl BindingStore for BTreeMap<String, String> {
    fn binding(&self, library_id: &str) -> Option<&str> {
        self.get(library_id).map(String::as_str)
    }

    fn set_binding(&mut self, library_id: &str, title: String) {
        self.insert(library_id.to_string(), title);
    }
}

impl BindingStore for ConfigStore {
    fn binding(&self, library_id: &str) -> Option<&str> {
        self.bindings().binding(library_id)
    }

    fn set_binding(&mut self, library_id: &str, title: String) {
        self.bindings_mut().set_binding(library_id, title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_lowercases() {
        let mut bindings: BTreeMap<String, String> = BTreeMap::new();
        assert!(bindings.remember("42", "Shingeki no Kyojin S3"));
        assert_eq!(bindings.binding("42"), Some("shingeki no kyojin s3"));
    }

    #[test]
    fn test_remember_never_overwrites() {
        let mut bindings: BTreeMap<String, String> = BTreeMap::new();
        assert!(bindings.remember("42", "Show Title"));
        assert!(!bindings.remember("42", "Show Title Renamed"));
        assert_eq!(bindings.binding("42"), Some("show title"));
    }

    #[test]
    fn test_unknown_id() {
        let bindings: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(bindings.binding("nope"), None);
    }
}
