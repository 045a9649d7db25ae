mod config;
mod error;
mod models;
mod plan;
mod reconciler;

pub use self::config::*;
pub use error::*;
pub use models::*;
pub use plan::*;
pub use reconciler::*;
