mod api;
mod client;
mod config;
mod models;

pub use api::*;
pub use client::*;
pub use self::config::*;
pub use models::*;

#[cfg(test)]
pub(crate) mod testing;
