//! Steam Web API retriever.
//!
//! Calls `GetPlayerAchievements` once with `appid`, `key`, `steamid` and `l`
//! appended to the configured base URL.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::{HttpSettings, SteamSettings};
use crate::parser::Parser;

use super::http_client::build_http_client;
use super::{
    AchievementSource, AchievementsRetriever, RetrievalResult, RetrieveError, first_missing,
    send_and_parse,
};

const PROVIDER: &str = "steam";

/// Retriever for the Steam Web API.
pub struct SteamRetriever {
    client: Client,
    settings: SteamSettings,
}

impl fmt::Debug for SteamRetriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamRetriever")
            .field("address_api", &self.settings.address_api)
            .field("application_id", &self.settings.application_id)
            .field("steam_id", &self.settings.steam_id)
            .field("language", &self.settings.language)
            .finish_non_exhaustive()
    }
}

impl SteamRetriever {
    /// Creates a Steam retriever.
    ///
    /// Settings are not validated here; [`fetch_all`](AchievementsRetriever::fetch_all)
    /// rejects incomplete settings before sending anything.
    ///
    /// # Errors
    ///
    /// Returns [`RetrieveError::Client`] if the HTTP client cannot be built.
    pub fn new(settings: SteamSettings, http: HttpSettings) -> Result<Self, RetrieveError> {
        let client = build_http_client(PROVIDER, http)?;
        Ok(Self { client, settings })
    }

    fn validate(&self) -> Result<(), RetrieveError> {
        let settings = &self.settings;
        match first_missing(&[
            ("address_api", settings.address_api.as_str()),
            ("application_id", settings.application_id.as_str()),
            ("authentication_key", settings.authentication_key.as_str()),
            ("steam_id", settings.steam_id.as_str()),
            ("language", settings.language.as_str()),
        ]) {
            Some(field) => Err(RetrieveError::Configuration {
                provider: PROVIDER,
                field,
            }),
            None => Ok(()),
        }
    }

    /// Builds the request URL with all query parameters.
    fn request_url(&self) -> Result<Url, RetrieveError> {
        let settings = &self.settings;
        let mut url =
            Url::parse(settings.address_api.trim()).map_err(|e| RetrieveError::InvalidUrl {
                url: settings.address_api.clone(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("appid", settings.application_id.trim())
            .append_pair("key", settings.authentication_key.trim())
            .append_pair("steamid", settings.steam_id.trim())
            .append_pair("l", settings.language.trim());
        Ok(url)
    }
}

/// Renders a URL without its query string, which carries the API key.
fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

#[async_trait]
impl AchievementsRetriever for SteamRetriever {
    fn source(&self) -> AchievementSource {
        AchievementSource::Steam
    }

    #[tracing::instrument(skip(self), fields(provider = PROVIDER, appid = %self.settings.application_id))]
    async fn fetch_all(&self) -> Result<RetrievalResult, RetrieveError> {
        self.validate()?;
        let url = self.request_url()?;
        let display_url = redacted(&url);
        debug!(url = %display_url, "Requesting Steam achievements");

        let result = send_and_parse(
            &self.client,
            url,
            &display_url,
            Parser::for_source(AchievementSource::Steam),
        )
        .await?;

        if result.success {
            info!(
                count = result.achievements.len(),
                game = result.game_name.as_deref().unwrap_or_default(),
                "Fetched Steam achievements"
            );
        }
        Ok(result)
    }
}
