//! Kitsu credentials kept in the config file.

use chrono::Utc;
use shiori_api::kitsu::{auth, KitsuClient};
use shiori_core::config::ConfigStore;

use crate::error::CliError;

/// Log in with a username and password and persist the tokens.
pub async fn login(store: &mut ConfigStore, username: &str, password: &str) -> Result<(), CliError> {
    let token = auth::authenticate(username, password).await?;
    let kitsu = store.kitsu_mut();
    kitsu.username = Some(username.to_string());
    kitsu.expires_at = token.expires_at();
    kitsu.refresh_token = token.refresh_token;
    kitsu.access_token = Some(token.access_token);
    store.save()?;
    tracing::info!(username, "logged in to Kitsu");
    Ok(())
}

/// Build a client from the stored token, refreshing it first when expired.
pub async fn client(store: &mut ConfigStore) -> Result<KitsuClient, CliError> {
    if store.kitsu().needs_refresh(Utc::now()) {
        if let Some(refresh_token) = store.kitsu().refresh_token.clone() {
            let token = auth::refresh(&refresh_token).await?;
            let kitsu = store.kitsu_mut();
            kitsu.expires_at = token.expires_at();
            if token.refresh_token.is_some() {
                kitsu.refresh_token = token.refresh_token;
            }
            kitsu.access_token = Some(token.access_token);
            store.save()?;
            tracing::info!("refreshed Kitsu access token");
        }
    }

    let token = store
        .kitsu()
        .access_token
        .clone()
        .ok_or(CliError::NotLoggedIn)?;
    Ok(KitsuClient::new(token))
}
