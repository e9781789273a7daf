use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;

use super::error::KitsuError;

const TOKEN_URL: &str = "https://kitsu.app/api/oauth/token";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    #[allow(dead_code)]
    pub token_type: Option<String>,
    pub created_at: Option<i64>,
}

impl TokenResponse {
    /// Absolute expiry time, when the server reported a lifetime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let lifetime = Duration::seconds(self.expires_in?);
        let issued = self
            .created_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);
        Some(issued + lifetime)
    }
}

/// Authenticate with Kitsu using Resource Owner Password Grant.
pub async fn authenticate(username: &str, password: &str) -> Result<TokenResponse, KitsuError> {
    tracing::debug!(username, "requesting Kitsu access token");
    request_token(&[
        ("grant_type", "password"),
        ("username", username),
        ("password", password),
    ])
    .await
}

/// Refresh an expired access token.
pub async fn refresh(refresh_token: &str) -> Result<TokenResponse, KitsuError> {
    tracing::debug!("refreshing Kitsu access token");
    request_token(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ])
    .await
}

async fn request_token(form: &[(&str, &str)]) -> Result<TokenResponse, KitsuError> {
    let http = reqwest::Client::new();
    let resp = http.post(TOKEN_URL).form(form).send().await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        if status == 400 || status == 401 {
            return Err(KitsuError::Auth(format!("token request rejected: {body}")));
        }
        return Err(KitsuError::Api {
            status,
            message: body,
        });
    }

    resp.json::<TokenResponse>()
        .await
        .map_err(|e| KitsuError::Parse(e.to_string()))
}
