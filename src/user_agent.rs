//! User-Agent string for provider requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/achievements";

/// Default User-Agent for provider requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("achievements/{version} (achievement-exporter; +{PROJECT_UA_URL})")
}
