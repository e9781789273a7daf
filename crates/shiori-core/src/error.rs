use std::path::PathBuf;

use shiori_parse::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShioriError {
    #[error("could not parse file name: {0}")]
    Parse(#[from] ParseError),

    #[error("working directory does not exist: {}", .0.display())]
    WorkingDirectoryMissing(PathBuf),

    #[error("no file found for \"{search}\" episode {episode}")]
    FileNotFound { search: String, episode: u32 },

    #[error("multiple files match: {}", .0.join(", "))]
    AmbiguousFiles(Vec<String>),

    #[error("multiple library entries match: {}", .0.join(", "))]
    AmbiguousEntries(Vec<String>),

    #[error("no library entry matches \"{0}\"")]
    EntryNotFound(String),

    #[error("remote update failed: {0}")]
    RemoteUpdate(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("could not move \"{file}\" into the watched directory: {source}")]
    Relocation {
        file: String,
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShioriError {
    /// Operator guidance for the conditions that need a specific fix.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Parse(ParseError::BatchRelease) => Some(
                "the season has concluded as a batch release; \
                 set the progress manually with --force",
            ),
            Self::Parse(ParseError::UnrecognizedFormat) => {
                Some("this release group's naming convention is not supported")
            }
            Self::AmbiguousFiles(_) | Self::AmbiguousEntries(_) => {
                Some("rerun with a more specific name")
            }
            Self::EntryNotFound(_) => Some(
                "the series may not be in your watch list, the cache may be stale \
                 (run `shiori sync`), or no file binding exists yet for its on-disk title",
            ),
            Self::Relocation { .. } => Some(
                "progress was already updated; move the file into watched/ by hand",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_lists_every_candidate() {
        let err = ShioriError::AmbiguousEntries(vec!["Overlord".into(), "Overlord II".into()]);
        assert_eq!(
            err.to_string(),
            "multiple library entries match: Overlord, Overlord II"
        );
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_batch_and_unrecognized_hints_differ() {
        let batch = ShioriError::from(ParseError::BatchRelease);
        let unknown = ShioriError::from(ParseError::UnrecognizedFormat);
        assert_ne!(batch.hint(), unknown.hint());
    }
}
