use snafu::prelude::*;

use crate::common;

/// Failure of a single resource operation, naming the step that failed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Error creating domain {domain}: {source}"))]
    CreateError {
        domain: String,
        source: common::Error,
    },
    #[snafu(display("Error managing domain {domain}: no uuid known"))]
    MissingUuidError { domain: String },
    #[snafu(display("Error updating tracking settings of {uuid}: {source}"))]
    TrackingUpdateError {
        uuid: String,
        source: common::Error,
    },
    #[snafu(display("Error reading back domain status of {uuid}: {source}"))]
    ReadBackError {
        uuid: String,
        source: common::Error,
    },
    #[snafu(display("Error reading domain {uuid}: {source}"))]
    ReadError {
        uuid: String,
        source: common::Error,
    },
    #[snafu(display("Error deleting domain {uuid}: {source}"))]
    DeleteError {
        uuid: String,
        source: common::Error,
    },
    #[snafu(display("Error importing domain {id}: {source}"))]
    ImportError { id: String, source: common::Error },
    #[snafu(display("{message}"))]
    UnsupportedOperationError { message: String },
    #[snafu(display("Domain cannot change from {current} to {desired} in place, it must be replaced"))]
    RequiresReplaceError { current: String, desired: String },
}

impl Error {
    /// The API error behind this failure, if a remote call caused it.
    pub fn api_error(&self) -> Option<&common::Error> {
        match self {
            Error::CreateError { source, .. }
            | Error::TrackingUpdateError { source, .. }
            | Error::ReadBackError { source, .. }
            | Error::ReadError { source, .. }
            | Error::DeleteError { source, .. }
            | Error::ImportError { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.api_error().and_then(common::Error::status)
    }

    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(common::Error::is_not_found)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
