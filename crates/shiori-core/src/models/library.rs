use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiori_api::LibraryListEntry;

/// A cached entry of the user's currently-watching list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Remote library entry ID.
    pub library_id: String,
    pub original_title: String,
    pub localized_title: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Episodes watched.
    pub episode_progress: u32,
    /// Total episodes, `None` until the service publishes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LibraryEntry {
    /// Original title, localized title, then synonyms.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        [self.original_title.as_str(), self.localized_title.as_str()]
            .into_iter()
            .chain(self.synonyms.iter().map(String::as_str))
    }

    /// Case-insensitive substring match against every title variant.
    pub fn matches(&self, search_term: &str) -> bool {
        let needle = search_term.to_lowercase();
        self.titles().any(|t| t.to_lowercase().contains(&needle))
    }

    /// Watched progress equals the known total.
    pub fn is_complete(&self) -> bool {
        self.episode_progress > 0 && Some(self.episode_progress) == self.episode_count
    }

    /// `7/12`, or `7/?` while the total is unknown.
    pub fn progress_label(&self) -> String {
        match self.episode_count {
            Some(total) if total > 0 => format!("{}/{}", self.episode_progress, total),
            _ => format!("{}/?", self.episode_progress),
        }
    }
}

impl From<LibraryListEntry> for LibraryEntry {
    fn from(entry: LibraryListEntry) -> Self {
        Self {
            library_id: entry.library_id,
            original_title: entry.original_title,
            localized_title: entry.localized_title,
            synonyms: entry.synonyms,
            episode_progress: entry.progress,
            episode_count: entry.episode_count,
            updated_at: None,
        }
    }
}
