mod config;
mod error;
mod logger;
mod models;

pub(crate) use self::config::*;
pub use error::*;
pub use logger::*;
pub use models::*;

#[cfg(test)]
pub(crate) use logger::testing;
