//! GOG profile page retriever.
//!
//! The configured address is a template; `{User}` and `{GameId}` are replaced
//! with the percent-encoded settings values. The page embeds the achievement
//! list as a script assignment, which [`GogParser`](crate::parser::GogParser)
//! extracts.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::{GogSettings, HttpSettings};
use crate::parser::Parser;

use super::http_client::build_http_client;
use super::{
    AchievementSource, AchievementsRetriever, RetrievalResult, RetrieveError, first_missing,
    send_and_parse,
};

const PROVIDER: &str = "gog";
const USER_PLACEHOLDER: &str = "{User}";
const GAME_ID_PLACEHOLDER: &str = "{GameId}";

/// Retriever for GOG profile pages.
#[derive(Debug)]
pub struct GogRetriever {
    client: Client,
    settings: GogSettings,
}

impl GogRetriever {
    /// Creates a GOG retriever.
    ///
    /// # Errors
    ///
    /// Returns [`RetrieveError::Client`] if the HTTP client cannot be built.
    pub fn new(settings: GogSettings, http: HttpSettings) -> Result<Self, RetrieveError> {
        let client = build_http_client(PROVIDER, http)?;
        Ok(Self { client, settings })
    }

    fn validate(&self) -> Result<(), RetrieveError> {
        let settings = &self.settings;
        match first_missing(&[
            ("address_api", settings.address_api.as_str()),
            ("user", settings.user.as_str()),
            ("game_id", settings.game_id.as_str()),
        ]) {
            Some(field) => Err(RetrieveError::Configuration {
                provider: PROVIDER,
                field,
            }),
            None => Ok(()),
        }
    }

    /// Expands the address template into the request URL.
    fn request_url(&self) -> Result<Url, RetrieveError> {
        let settings = &self.settings;
        let expanded = settings
            .address_api
            .trim()
            .replace(USER_PLACEHOLDER, &urlencoding::encode(settings.user.trim()))
            .replace(
                GAME_ID_PLACEHOLDER,
                &urlencoding::encode(settings.game_id.trim()),
            );
        Url::parse(&expanded).map_err(|e| RetrieveError::InvalidUrl {
            url: expanded.clone(),
            reason: e.to_string(),
        })
    }

    /// Name used when the page does not report one.
    fn fallback_game_name(&self) -> String {
        self.settings
            .game_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.settings.game_id.trim())
            .to_string()
    }
}

#[async_trait]
impl AchievementsRetriever for GogRetriever {
    fn source(&self) -> AchievementSource {
        AchievementSource::Gog
    }

    #[tracing::instrument(skip(self), fields(provider = PROVIDER, game_id = %self.settings.game_id))]
    async fn fetch_all(&self) -> Result<RetrievalResult, RetrieveError> {
        self.validate()?;
        let url = self.request_url()?;
        let display_url = url.to_string();
        debug!(url = %display_url, "Requesting GOG achievements");

        let mut result = send_and_parse(
            &self.client,
            url,
            &display_url,
            Parser::for_source(AchievementSource::Gog),
        )
        .await?;

        if result.success {
            if result.game_name.is_none() {
                result.game_name = Some(self.fallback_game_name());
            }
            info!(
                count = result.achievements.len(),
                game = result.game_name.as_deref().unwrap_or_default(),
                "Fetched GOG achievements"
            );
        }
        Ok(result)
    }
}
