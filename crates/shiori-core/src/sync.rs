//! Progress synchronization against the remote library.

use chrono::Utc;
use shiori_api::LibraryService;
use shiori_parse::ParsedFilename;

use crate::bindings::BindingStore;
use crate::config::ConfigStore;
use crate::error::ShioriError;
use crate::models::LibraryEntry;

/// What happened to the cached entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Progress stored; the entry stays tracked.
    Updated {
        entry: LibraryEntry,
        binding_created: bool,
    },
    /// The final episode was watched and the entry left the cache.
    Completed { entry: LibraryEntry },
}

/// A non-zero forced episode wins over the number parsed from the file.
///
/// The override covers releases numbered differently from the library,
/// such as absolute numbering for a later season.
pub fn target_progress(explicit_progress: Option<u32>, parsed_episode: u32) -> u32 {
    match explicit_progress {
        Some(forced) if forced > 0 => forced,
        _ => parsed_episode,
    }
}

/// Push progress for `cache[cache_index]` and reconcile the local state.
///
/// The remote's confirmed progress is authoritative. An entry whose progress
/// reaches its known episode count is evicted from the cache without a
/// binding being written; otherwise the file's title is remembered as the
/// entry's binding if it has none. The store is saved in both cases.
pub async fn synchronize<S: LibraryService>(
    service: &S,
    store: &mut ConfigStore,
    mut cache: Vec<LibraryEntry>,
    cache_index: usize,
    explicit_progress: Option<u32>,
    parsed: &ParsedFilename,
) -> Result<SyncOutcome, ShioriError> {
    let Some(entry) = cache.get_mut(cache_index) else {
        return Err(ShioriError::Config(format!(
            "cache index {cache_index} out of range ({} entries)",
            cache.len()
        )));
    };

    let target = target_progress(explicit_progress, parsed.episode_number);
    tracing::info!(
        library_id = %entry.library_id,
        title = %entry.original_title,
        target,
        forced = explicit_progress.is_some_and(|p| p > 0),
        "updating remote progress"
    );

    let update = service
        .update_progress(&entry.library_id, target)
        .await
        .map_err(|e| ShioriError::RemoteUpdate(Box::new(e)))?;

    entry.episode_progress = update.progress;
    entry.episode_count = update.episode_count;
    entry.updated_at = Some(Utc::now());

    if entry.is_complete() {
        let entry = cache.remove(cache_index);
        tracing::info!(library_id = %entry.library_id, "series completed, removing from cache");
        store.set_cache(cache);
        store.save()?;
        return Ok(SyncOutcome::Completed { entry });
    }

    let binding_created = store.remember(&entry.library_id, &parsed.search_title());
    let entry = entry.clone();
    store.set_cache(cache);
    store.save()?;

    Ok(SyncOutcome::Updated {
        entry,
        binding_created,
    })
}

/// Replace the cache with the user's currently-watching entries.
///
/// Bindings are kept; entries that left the list simply orphan theirs.
pub async fn refresh_cache<S: LibraryService>(
    service: &S,
    store: &mut ConfigStore,
) -> Result<usize, ShioriError> {
    let entries = service
        .current_entries()
        .await
        .map_err(|e| ShioriError::RemoteUpdate(Box::new(e)))?;

    let cache: Vec<LibraryEntry> = entries.into_iter().map(LibraryEntry::from).collect();
    let count = cache.len();
    store.set_cache(cache);
    store.save()?;

    tracing::info!(count, "library cache refreshed");
    Ok(count)
}
