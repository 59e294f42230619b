use thiserror::Error;

/// Failure talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error requesting {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GitHub API returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to parse JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
