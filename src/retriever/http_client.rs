//! Shared HTTP client construction for provider retrievers.
//!
//! Both retrievers use the same timeout, user-agent and compression policy so
//! provider requests behave consistently.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::warn;

use crate::config::HttpSettings;
use crate::user_agent;

use super::RetrieveError;

/// Builds the HTTP client used by one retriever.
///
/// # Errors
///
/// Returns [`RetrieveError::Client`] when client construction fails.
pub(crate) fn build_http_client(
    provider: &'static str,
    settings: HttpSettings,
) -> Result<Client, RetrieveError> {
    match catch_unwind(AssertUnwindSafe(|| base_builder(settings).build())) {
        Ok(result) => result.map_err(|source| RetrieveError::Client { provider, source }),
        Err(_) => {
            // Some sandboxed environments panic when reading system proxy
            // settings; retry without system proxy lookup.
            warn!(
                provider,
                "HTTP client hit system proxy panic; building without system proxy lookup"
            );
            base_builder(settings)
                .no_proxy()
                .build()
                .map_err(|source| RetrieveError::Client { provider, source })
        }
    }
}

fn base_builder(settings: HttpSettings) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.read_timeout_secs))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
}
