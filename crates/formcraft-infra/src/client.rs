//! Shared outbound HTTP client construction.

use std::time::Duration;

use formcraft_types::config::GlobalConfig;

const USER_AGENT: &str = concat!("formcraft/", env!("CARGO_PKG_VERSION"));

/// Build the reqwest client used for every outbound call.
pub fn build_http_client(config: &GlobalConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Append `segments` to the path of `base`, percent-encoding each one so
/// reserved characters in caller-supplied ids stay inside their segment.
pub(crate) fn segment_url(base: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(base).map_err(|e| format!("invalid base URL '{base}': {e}"))?;
    url.path_segments_mut()
        .map_err(|()| format!("base URL '{base}' cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
