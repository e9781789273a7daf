//! Candidate resolution: which file on disk, and which cached library entry.
//!
//! Both steps insist on exactly one match. Ambiguity is reported with the
//! full candidate list and never settled by picking the first hit.

use std::path::Path;

use walkdir::WalkDir;

use crate::bindings::BindingStore;
use crate::error::ShioriError;
use crate::models::LibraryEntry;

/// Longest file name shown in an ambiguity report.
const DISPLAY_NAME_LIMIT: usize = 60;

/// The episode token as it appears in release names: `- 07`, `- 12`, `- 112`.
pub fn episode_token(episode: u32) -> String {
    if episode < 10 {
        format!("- 0{episode}")
    } else {
        format!("- {episode}")
    }
}

/// All files directly inside `directory` that look like the requested episode.
///
/// A name qualifies when it starts with a bracketed group tag, contains
/// `search_term` case-insensitively and contains the literal episode token.
pub fn candidate_files(
    directory: &Path,
    search_term: &str,
    episode: u32,
) -> Result<Vec<String>, ShioriError> {
    if !directory.is_dir() {
        return Err(ShioriError::WorkingDirectoryMissing(directory.to_path_buf()));
    }

    let needle = search_term.to_lowercase();
    let token = episode_token(episode);

    let mut names: Vec<String> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| {
            name.starts_with('[') && name.to_lowercase().contains(&needle) && name.contains(&token)
        })
        .collect();
    names.sort();

    tracing::debug!(
        dir = %directory.display(),
        search_term,
        token = %token,
        found = names.len(),
        "listed candidate files"
    );
    Ok(names)
}

/// Resolve the single file for `search_term` and `episode`.
pub fn resolve_candidate_file(
    directory: &Path,
    search_term: &str,
    episode: u32,
) -> Result<String, ShioriError> {
    let mut names = candidate_files(directory, search_term, episode)?;
    match names.len() {
        0 => Err(ShioriError::FileNotFound {
            search: search_term.to_string(),
            episode,
        }),
        1 => Ok(names.remove(0)),
        _ => Err(ShioriError::AmbiguousFiles(
            names
                .iter()
                .map(|n| truncate_name(n, DISPLAY_NAME_LIMIT))
                .collect(),
        )),
    }
}

/// Resolve the cached library entry for a resolved file.
///
/// Entries whose remembered binding equals the file's title take precedence.
/// Without such a binding, `search_term` is matched case-insensitively as a
/// substring of each entry's titles and synonyms.
pub fn resolve_cache_entry<'a, B: BindingStore + ?Sized>(
    cache: &'a [LibraryEntry],
    bindings: &B,
    file_title: &str,
    search_term: &str,
) -> Result<(usize, &'a LibraryEntry), ShioriError> {
    let file_title = file_title.trim().to_lowercase();

    let bound: Vec<usize> = cache
        .iter()
        .enumerate()
        .filter(|(_, e)| bindings.binding(&e.library_id) == Some(file_title.as_str()))
        .map(|(i, _)| i)
        .collect();

    let matches: Vec<usize> = if bound.is_empty() {
        cache
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches(search_term))
            .map(|(i, _)| i)
            .collect()
    } else {
        tracing::debug!(file_title = %file_title, "matched through file binding");
        bound
    };

    match matches.as_slice() {
        [] => Err(ShioriError::EntryNotFound(search_term.to_string())),
        [index] => Ok((*index, &cache[*index])),
        many => Err(ShioriError::AmbiguousEntries(
            many.iter()
                .map(|&i| cache[i].original_title.clone())
                .collect(),
        )),
    }
}

fn truncate_name(name: &str, limit: usize) -> String {
    if name.chars().count() <= limit {
        return name.to_string();
    }
    let mut truncated: String = name.chars().take(limit.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    fn entry(id: &str, original: &str, localized: &str) -> LibraryEntry {
        LibraryEntry {
            library_id: id.into(),
            original_title: original.into(),
            localized_title: localized.into(),
            synonyms: vec![],
            episode_progress: 0,
            episode_count: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_episode_token() {
        assert_eq!(episode_token(7), "- 07");
        assert_eq!(episode_token(12), "- 12");
        assert_eq!(episode_token(112), "- 112");
    }

    #[test]
    fn test_filters_by_title_and_episode() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "[G] A - 07.mkv");
        touch(dir.path(), "[G] B - 07.mkv");

        let files = candidate_files(dir.path(), "a", 7).unwrap();
        assert_eq!(files, vec!["[G] A - 07.mkv"]);
    }

    #[test]
    fn test_requires_bracket_prefix_and_token() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Show - 07.mkv");
        touch(dir.path(), "[G] Show - 08.mkv");
        touch(dir.path(), "[G] Show - 07 (1080p).mkv");
        std::fs::create_dir(dir.path().join("[G] Show - 07 extras")).unwrap();

        let name = resolve_candidate_file(dir.path(), "show", 7).unwrap();
        assert_eq!(name, "[G] Show - 07 (1080p).mkv");
    }

    #[test]
    fn test_token_is_literal_substring() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "[G] Show - 112.mkv");

        assert!(candidate_files(dir.path(), "show", 12).unwrap().is_empty());
        assert_eq!(candidate_files(dir.path(), "show", 11).unwrap().len(), 1);
    }

    #[test]
    fn test_no_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "[G] Show - 01.mkv");
        assert!(matches!(
            resolve_candidate_file(dir.path(), "show", 2),
            Err(ShioriError::FileNotFound { episode: 2, .. })
        ));
    }

    #[test]
    fn test_ambiguous_files_are_listed_and_truncated() {
        let dir = TempDir::new().unwrap();
        let long = format!("[G] Show {} - 03.mkv", "x".repeat(80));
        touch(dir.path(), "[G] Show - 03.mkv");
        touch(dir.path(), &long);

        match resolve_candidate_file(dir.path(), "show", 3) {
            Err(ShioriError::AmbiguousFiles(names)) => {
                assert_eq!(names.len(), 2);
                assert!(names.iter().all(|n| n.chars().count() <= DISPLAY_NAME_LIMIT));
            }
            other => panic!("Expected AmbiguousFiles, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        assert!(matches!(
            resolve_candidate_file(&missing, "show", 1),
            Err(ShioriError::WorkingDirectoryMissing(_))
        ));
    }

    #[test]
    fn test_single_entry_match() {
        let cache = vec![
            entry("1", "Sousou no Frieren", "Frieren: Beyond Journey's End"),
            entry("2", "Shingeki no Kyojin", "Attack on Titan"),
        ];
        let bindings: BTreeMap<String, String> = BTreeMap::new();
        let (index, found) = resolve_cache_entry(&cache, &bindings, "Frieren", "frieren").unwrap();
        assert_eq!(index, 0);
        assert_eq!(found.library_id, "1");
    }

    #[test]
    fn test_ambiguous_entries_listed() {
        let cache = vec![
            entry("1", "Overlord", "Overlord"),
            entry("2", "Overlord II", "Overlord II"),
        ];
        let bindings: BTreeMap<String, String> = BTreeMap::new();
        match resolve_cache_entry(&cache, &bindings, "Overlord", "overlord") {
            Err(ShioriError::AmbiguousEntries(titles)) => {
                assert_eq!(titles, vec!["Overlord", "Overlord II"]);
            }
            other => panic!("Expected AmbiguousEntries, got {other:?}"),
        }
    }

    #[test]
    fn test_binding_disambiguates() {
        let cache = vec![
            entry("1", "Overlord", "Overlord"),
            entry("2", "Overlord II", "Overlord II"),
        ];
        let mut bindings = BTreeMap::new();
        bindings.insert("2".to_string(), "overlord s2".to_string());

        let (index, _) =
            resolve_cache_entry(&cache, &bindings, "Overlord S2", "overlord").unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_binding_for_messy_title() {
        let cache = vec![entry("5", "Boku no Kokoro no Yabai Yatsu", "The Dangers in My Heart")];
        let mut bindings = BTreeMap::new();
        bindings.insert("5".to_string(), "bokuyaba".to_string());

        let (index, _) = resolve_cache_entry(&cache, &bindings, "BokuYaba", "bokuyaba").unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_entry_not_found() {
        let cache = vec![entry("1", "Sousou no Frieren", "Frieren")];
        let bindings: BTreeMap<String, String> = BTreeMap::new();
        assert!(matches!(
            resolve_cache_entry(&cache, &bindings, "Dandadan", "dandadan"),
            Err(ShioriError::EntryNotFound(_))
        ));
    }
}
