//! Trait definitions for remote library services.
//!
//! The progress synchronizer only talks to [`LibraryService`], so the core
//! stays independent of the HTTP transport and can be driven by a fake in
//! tests.

use std::future::Future;

/// A remote library holding the user's watch progress.
pub trait LibraryService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Set the watched episode count of a library entry.
    ///
    /// Returns the progress the service actually stored together with the
    /// series' total episode count, when the service knows it.
    fn update_progress(
        &self,
        library_id: &str,
        progress: u32,
    ) -> impl Future<Output = Result<ProgressUpdate, Self::Error>> + Send;

    /// Fetch every entry the user is currently watching.
    fn current_entries(
        &self,
    ) -> impl Future<Output = Result<Vec<LibraryListEntry>, Self::Error>> + Send;
}

/// Confirmed state of a library entry after a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub progress: u32,
    pub episode_count: Option<u32>,
}

/// A currently-watching entry from the user's remote library.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LibraryListEntry {
    pub library_id: String,
    pub original_title: String,
    pub localized_title: String,
    pub synonyms: Vec<String>,
    pub progress: u32,
    pub episode_count: Option<u32>,
}
