use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{method} {url} failed: {source}"))]
    TransportError {
        method: String,
        url: String,
        source: ureq::Error,
    },
    #[snafu(display("{method} {url} failed: cannot read response body: {source}"))]
    ReadBodyError {
        method: String,
        url: String,
        source: std::io::Error,
    },
    #[snafu(display("{method} {url} failed: invalid response status code {status}\n{body}"))]
    HttpStatusError {
        method: String,
        url: String,
        status: u16,
        body: String,
    },
    #[snafu(display("{method} {url} failed: not found\n{body}"))]
    NotFoundError {
        method: String,
        url: String,
        body: String,
    },
    #[snafu(display("{method} {url} failed: cannot serialize JSON body: {source}"))]
    EncodeError {
        method: String,
        url: String,
        source: serde_json::Error,
    },
    #[snafu(display("{method} {url} failed: cannot parse response body: {source}\n{body}"))]
    DecodeError {
        method: String,
        url: String,
        body: String,
        source: serde_json::Error,
    },
    #[snafu(display("{prefix}: {message}"))]
    ConfigError { prefix: String, message: String },
    #[snafu(display("{message}: {source}"))]
    StateError {
        message: String,
        source: Box<dyn std::error::Error>,
    },
}

impl Error {
    /// HTTP status code of the failed response, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatusError { status, .. } => Some(*status),
            Error::NotFoundError { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFoundError { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
