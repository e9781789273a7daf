use reqwest::Client;

use super::error::KitsuError;
use super::types::{
    list_entries_from_page, progress_update_from_response, JsonApiListResponse,
    JsonApiSingleResourceResponse,
};
use crate::traits::{LibraryListEntry, LibraryService, ProgressUpdate};

const BASE_URL: &str = "https://kitsu.app/api/edge";

const JSON_API: &str = "application/vnd.api+json";

/// Kitsu JSON:API client.
pub struct KitsuClient {
    access_token: String,
    http: Client,
}

impl KitsuClient {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            http: Client::new(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, KitsuError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(KitsuError::Api {
                status,
                message: body,
            })
        }
    }

    /// Get the authenticated user's Kitsu ID.
    pub async fn get_user_id(&self) -> Result<String, KitsuError> {
        let resp = self
            .http
            .get(format!("{BASE_URL}/users"))
            .header("Authorization", self.auth_header())
            .header("Accept", JSON_API)
            .query(&[("filter[self]", "true"), ("fields[users]", "name")])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: JsonApiListResponse = resp
            .json()
            .await
            .map_err(|e| KitsuError::Parse(e.to_string()))?;

        body.data
            .first()
            .map(|r| r.id.clone())
            .ok_or_else(|| KitsuError::Auth("could not find authenticated user".into()))
    }
}

impl LibraryService for KitsuClient {
    type Error = KitsuError;

    async fn update_progress(
        &self,
        library_id: &str,
        progress: u32,
    ) -> Result<ProgressUpdate, KitsuError> {
        let patch_body = serde_json::json!({
            "data": {
                "id": library_id,
                "type": "libraryEntries",
                "attributes": { "progress": progress }
            }
        });

        tracing::debug!(library_id, progress, "patching Kitsu library entry");

        let resp = self
            .http
            .patch(format!("{BASE_URL}/library-entries/{library_id}"))
            .header("Authorization", self.auth_header())
            .header("Content-Type", JSON_API)
            .header("Accept", JSON_API)
            .query(&[
                ("include", "anime"),
                ("fields[libraryEntries]", "progress,status,anime"),
                ("fields[anime]", "episodeCount"),
            ])
            .json(&patch_body)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: JsonApiSingleResourceResponse = resp
            .json()
            .await
            .map_err(|e| KitsuError::Parse(e.to_string()))?;

        progress_update_from_response(body)
    }

    async fn current_entries(&self) -> Result<Vec<LibraryListEntry>, KitsuError> {
        let user_id = self.get_user_id().await?;
        let mut entries = Vec::new();
        let mut url = format!(
            "{BASE_URL}/users/{user_id}/library-entries\
             ?filter[kind]=anime\
             &filter[status]=current\
             &include=anime\
             &fields[libraryEntries]=progress,status,anime\
             &fields[anime]=canonicalTitle,titles,abbreviatedTitles,episodeCount\
             &page[limit]=50"
        );

        loop {
            let resp = self
                .http
                .get(&url)
                .header("Authorization", self.auth_header())
                .header("Accept", JSON_API)
                .send()
                .await?;

            let resp = Self::check_response(resp).await?;
            let page: JsonApiListResponse = resp
                .json()
                .await
                .map_err(|e| KitsuError::Parse(e.to_string()))?;

            entries.extend(list_entries_from_page(&page)?);

            match page.links.and_then(|l| l.next) {
                Some(next_url) => url = next_url,
                None => break,
            }
        }

        tracing::debug!(count = entries.len(), "fetched current Kitsu library entries");
        Ok(entries)
    }
}
