use snafu::prelude::*;

use crate::{common, domain};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{source}"))]
    ReconcileError { source: domain::Error },
    #[snafu(display("{source}"))]
    StoreError { source: common::Error },
    #[snafu(display("Listing domains failed: {source}"))]
    ListError { source: common::Error },
    #[snafu(display("No resource named {name} in state"))]
    UnknownResourceError { name: String },
    #[snafu(display("Resource {name} already manages domain {uuid}"))]
    AlreadyManagedError { name: String, uuid: String },
}

pub type Result<T> = std::result::Result<T, Error>;
