use std::collections::HashMap;

use serde::Deserialize;

use super::error::KitsuError;
use crate::traits::{LibraryListEntry, ProgressUpdate};

// ── JSON:API response types ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JsonApiListResponse {
    pub data: Vec<JsonApiResource>,
    pub included: Option<Vec<JsonApiResource>>,
    pub links: Option<Links>,
}

#[derive(Debug, Deserialize)]
pub struct JsonApiSingleResourceResponse {
    pub data: JsonApiResource,
    pub included: Option<Vec<JsonApiResource>>,
}

#[derive(Debug, Deserialize)]
pub struct JsonApiResource {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
    pub relationships: Option<serde_json::Value>,
}

impl JsonApiResource {
    /// ID of the resource linked under `relationships.<name>.data`.
    fn related_id(&self, name: &str) -> Option<&str> {
        self.relationships
            .as_ref()?
            .get(name)?
            .get("data")?
            .get("id")?
            .as_str()
    }
}

#[derive(Debug, Deserialize)]
pub struct Links {
    pub next: Option<String>,
}

// ── Kitsu-specific attributes ────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitsuAnimeAttributes {
    pub canonical_title: Option<String>,
    pub titles: Option<HashMap<String, Option<String>>>,
    pub abbreviated_titles: Option<Vec<String>>,
    pub episode_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitsuLibraryAttributes {
    pub progress: Option<u32>,
    pub status: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

impl KitsuAnimeAttributes {
    fn title(&self, key: &str) -> Option<String> {
        self.titles
            .as_ref()?
            .get(key)?
            .as_ref()
            .filter(|t| !t.is_empty())
            .cloned()
    }

    /// Romanized title, falling back to the canonical one.
    pub fn original_title(&self) -> String {
        self.title("en_jp")
            .or_else(|| self.canonical_title.clone())
            .unwrap_or_default()
    }

    /// English title, falling back to the canonical one.
    pub fn localized_title(&self) -> String {
        self.title("en")
            .or_else(|| self.title("en_us"))
            .or_else(|| self.canonical_title.clone())
            .unwrap_or_default()
    }

    /// Abbreviations plus any title variant not already used as a primary title.
    pub fn synonyms(&self) -> Vec<String> {
        let original = self.original_title();
        let localized = self.localized_title();
        let mut synonyms: Vec<String> = Vec::new();

        let mut push = |s: &str| {
            if !s.is_empty()
                && s != original
                && s != localized
                && !synonyms.iter().any(|existing| existing == s)
            {
                synonyms.push(s.to_string());
            }
        };

        for abbr in self.abbreviated_titles.iter().flatten() {
            push(abbr.as_str());
        }
        if let Some(canonical) = &self.canonical_title {
            push(canonical.as_str());
        }
        if let Some(titles) = &self.titles {
            let mut keys: Vec<&String> = titles.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(Some(title)) = titles.get(key) {
                    push(title.as_str());
                }
            }
        }
        synonyms
    }
}

/// Decode the response to a `PATCH /library-entries/{id}?include=anime`.
pub fn progress_update_from_response(
    body: JsonApiSingleResourceResponse,
) -> Result<ProgressUpdate, KitsuError> {
    let entry: KitsuLibraryAttributes = serde_json::from_value(body.data.attributes)
        .map_err(|e| KitsuError::Parse(e.to_string()))?;

    let episode_count = body
        .included
        .unwrap_or_default()
        .into_iter()
        .find(|r| r.type_ == "anime")
        .map(|r| serde_json::from_value::<KitsuAnimeAttributes>(r.attributes))
        .transpose()
        .map_err(|e| KitsuError::Parse(e.to_string()))?
        .and_then(|anime| anime.episode_count);

    Ok(ProgressUpdate {
        progress: entry.progress.unwrap_or(0),
        episode_count,
    })
}

/// Decode one page of library entries with their included anime.
pub fn list_entries_from_page(
    page: &JsonApiListResponse,
) -> Result<Vec<LibraryListEntry>, KitsuError> {
    let included = page.included.as_deref().unwrap_or_default();
    let anime_map: HashMap<&str, &JsonApiResource> = included
        .iter()
        .filter(|r| r.type_ == "anime")
        .map(|r| (r.id.as_str(), r))
        .collect();

    let mut entries = Vec::with_capacity(page.data.len());
    for resource in &page.data {
        let Some(anime) = resource
            .related_id("anime")
            .and_then(|id| anime_map.get(id))
        else {
            tracing::warn!(library_id = %resource.id, "library entry without included anime, skipping");
            continue;
        };

        let entry: KitsuLibraryAttributes = serde_json::from_value(resource.attributes.clone())
            .map_err(|e| KitsuError::Parse(e.to_string()))?;
        let anime: KitsuAnimeAttributes = serde_json::from_value(anime.attributes.clone())
            .map_err(|e| KitsuError::Parse(e.to_string()))?;

        entries.push(LibraryListEntry {
            library_id: resource.id.clone(),
            original_title: anime.original_title(),
            localized_title: anime.localized_title(),
            synonyms: anime.synonyms(),
            progress: entry.progress.unwrap_or(0),
            episode_count: anime.episode_count,
        });
    }
    Ok(entries)
}
