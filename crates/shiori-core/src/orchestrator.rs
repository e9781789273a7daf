//! The watch pipeline: resolve → parse → match → synchronize → relocate.

use std::path::PathBuf;

use shiori_api::LibraryService;
use shiori_parse::ParsedFilename;

use crate::config::ConfigStore;
use crate::error::ShioriError;
use crate::models::LibraryEntry;
use crate::relocate::relocate;
use crate::resolver::{resolve_cache_entry, resolve_candidate_file};
use crate::sync::{synchronize, SyncOutcome};

/// One invocation of `shiori watch`.
#[derive(Debug, Clone)]
pub struct WatchRequest {
    /// Freeform name used to find the file and the library entry.
    pub search_term: String,
    /// Episode number as it appears in the file name.
    pub episode: u32,
    /// Progress to store instead of the parsed episode; `0` is ignored.
    pub forced_episode: Option<u32>,
    pub working_dir: PathBuf,
}

/// The locally resolved half of a watch: file, parsed name and cache entry.
///
/// Produced without touching the remote, so a missing file or an unknown
/// series is reported before any credentials are needed.
#[derive(Debug, Clone)]
pub struct PreparedWatch {
    pub file_name: String,
    pub parsed: ParsedFilename,
    cache: Vec<LibraryEntry>,
    cache_index: usize,
}

impl PreparedWatch {
    /// The cached entry the file resolved to.
    pub fn entry(&self) -> &LibraryEntry {
        &self.cache[self.cache_index]
    }
}

/// Result of a completed watch pipeline.
#[derive(Debug, Clone)]
pub struct WatchReport {
    pub file_name: String,
    pub outcome: SyncOutcome,
    pub moved_to: PathBuf,
}

/// Resolve the episode file and its cached library entry.
pub fn prepare_watch(
    store: &ConfigStore,
    request: &WatchRequest,
) -> Result<PreparedWatch, ShioriError> {
    if !request.working_dir.is_dir() {
        return Err(ShioriError::WorkingDirectoryMissing(
            request.working_dir.clone(),
        ));
    }

    let file_name =
        resolve_candidate_file(&request.working_dir, &request.search_term, request.episode)?;
    let parsed = shiori_parse::parse(&file_name)?;
    tracing::debug!(
        file = %file_name,
        group = %parsed.group,
        title = %parsed.title,
        episode = parsed.episode_number,
        "parsed episode file"
    );

    let cache = store.cache().to_vec();
    let (cache_index, entry) =
        resolve_cache_entry(&cache, store, &parsed.search_title(), &request.search_term)?;
    tracing::info!(
        library_id = %entry.library_id,
        title = %entry.original_title,
        "matched library entry"
    );

    Ok(PreparedWatch {
        file_name,
        parsed,
        cache,
        cache_index,
    })
}

/// Push progress for a prepared watch and move its file.
///
/// Remote progress is updated before the file is moved, so a
/// [`ShioriError::Relocation`] means the update itself already happened.
pub async fn complete_watch<S: LibraryService>(
    service: &S,
    store: &mut ConfigStore,
    request: &WatchRequest,
    prepared: PreparedWatch,
) -> Result<WatchReport, ShioriError> {
    let PreparedWatch {
        file_name,
        parsed,
        cache,
        cache_index,
    } = prepared;

    let outcome = synchronize(
        service,
        store,
        cache,
        cache_index,
        request.forced_episode,
        &parsed,
    )
    .await?;

    let moved_to = relocate(&file_name, &request.working_dir)?;

    Ok(WatchReport {
        file_name,
        outcome,
        moved_to,
    })
}

/// Run the whole pipeline for one episode file.
pub async fn process_watch<S: LibraryService>(
    service: &S,
    store: &mut ConfigStore,
    request: &WatchRequest,
) -> Result<WatchReport, ShioriError> {
    let prepared = prepare_watch(store, request)?;
    complete_watch(service, store, request, prepared).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::BindingStore;
    use crate::sync::tests::{entry, FakeService};
    use shiori_parse::ParseError;
    use tempfile::TempDir;

    fn request(dir: &TempDir, term: &str, episode: u32) -> WatchRequest {
        WatchRequest {
            search_term: term.into(),
            episode,
            forced_episode: None,
            working_dir: dir.path().to_path_buf(),
        }
    }

    fn setup(files: &[&str]) -> (TempDir, TempDir, ConfigStore) {
        let work = TempDir::new().unwrap();
        for name in files {
            std::fs::write(work.path().join(name), b"").unwrap();
        }
        let conf = TempDir::new().unwrap();
        let mut store = ConfigStore::load(conf.path().join("config.toml")).unwrap();
        store.set_cache(vec![
            entry("1", "Sousou no Frieren", 4, Some(28)),
            entry("2", "Dungeon Meshi", 23, Some(24)),
        ]);
        (work, conf, store)
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let (work, _conf, mut store) = setup(&["[SubsPlease] Sousou no Frieren - 05 (1080p).mkv"]);
        let service = FakeService::with_count(Some(28));

        let report = process_watch(&service, &mut store, &request(&work, "frieren", 5))
            .await
            .unwrap();

        assert!(matches!(report.outcome, SyncOutcome::Updated { .. }));
        assert!(report.moved_to.exists());
        assert_eq!(store.cache()[0].episode_progress, 5);
        assert_eq!(store.binding("1"), Some("sousou no frieren"));
    }

    #[tokio::test]
    async fn test_final_episode_completes() {
        let (work, _conf, mut store) = setup(&["[Erai-raws] Dungeon Meshi - 24 [1080p].mkv"]);
        let service = FakeService::with_count(Some(24));

        let report = process_watch(&service, &mut store, &request(&work, "dungeon", 24))
            .await
            .unwrap();

        assert!(matches!(report.outcome, SyncOutcome::Completed { .. }));
        assert_eq!(store.cache().len(), 1);
        assert_eq!(store.binding("2"), None);
    }

    #[tokio::test]
    async fn test_missing_working_dir() {
        let (work, _conf, mut store) = setup(&[]);
        let service = FakeService::with_count(None);
        let mut req = request(&work, "frieren", 5);
        req.working_dir = work.path().join("nope");

        let result = process_watch(&service, &mut store, &req).await;
        assert!(matches!(result, Err(ShioriError::WorkingDirectoryMissing(_))));
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_range_never_reaches_remote() {
        let batch = "[Erai-raws] Kusuriya no Hitorigoto - 01 ~ 12 [1080p][Batch].mkv";
        let (work, _conf, mut store) = setup(&[batch]);
        store.set_cache(vec![entry("1", "Kusuriya no Hitorigoto", 0, Some(24))]);
        let service = FakeService::with_count(Some(12));

        let result = process_watch(&service, &mut store, &request(&work, "kusuriya", 1)).await;

        assert!(matches!(
            result,
            Err(ShioriError::Parse(ParseError::BatchRelease))
        ));
        assert!(service.calls.lock().unwrap().is_empty());
        assert_eq!(store.cache().len(), 1);
        assert_eq!(store.cache()[0].episode_progress, 0);
        assert!(work.path().join(batch).exists());
    }

    #[test]
    fn test_prepare_resolves_without_service() {
        let (work, _conf, store) = setup(&["[SubsPlease] Sousou no Frieren - 05 (1080p).mkv"]);

        let prepared = prepare_watch(&store, &request(&work, "frieren", 5)).unwrap();
        assert_eq!(prepared.entry().library_id, "1");
        assert_eq!(prepared.parsed.episode_number, 5);

        let mut missing = request(&work, "frieren", 5);
        missing.working_dir = work.path().join("nope");
        assert!(matches!(
            prepare_watch(&store, &missing),
            Err(ShioriError::WorkingDirectoryMissing(_))
        ));
        assert!(matches!(
            prepare_watch(&store, &request(&work, "frieren", 6)),
            Err(ShioriError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_entry_does_not_touch_remote() {
        let (work, _conf, mut store) = setup(&["[SubsPlease] Dandadan - 03 (1080p).mkv"]);
        let service = FakeService::with_count(None);

        let result = process_watch(&service, &mut store, &request(&work, "dandadan", 3)).await;

        assert!(matches!(result, Err(ShioriError::EntryNotFound(_))));
        assert!(service.calls.lock().unwrap().is_empty());
        assert!(work.path().join("[SubsPlease] Dandadan - 03 (1080p).mkv").exists());
    }
}
