use std::path::PathBuf;

use podium_interchange::InterchangeError;

/// Errors returned by an [`HttpClient`](crate::HttpClient) implementation.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be completed (connection refused, DNS, timeout,
    /// unreadable body, or no canned response in a static client).
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The blocking task running the request panicked or was cancelled.
    #[error("http task failed: {0}")]
    Task(String),
}

/// All errors a verifier can report to its caller.
///
/// None of these mutate the page beyond hiding the promo spinner; an
/// expected negative answer (`result: false`) is an outcome, not an error.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The configured base URL cannot host the endpoint paths.
    #[error("invalid endpoint url '{url}': {message}")]
    Endpoint { url: String, message: String },

    /// The request never produced an HTTP response.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The endpoint answered outside the 200..400 status range.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The body did not match any known response shape.
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: InterchangeError,
    },
}

/// Errors while loading a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
