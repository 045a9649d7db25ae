pub mod common;
pub mod config;
pub mod domain;
pub mod service;
pub mod state;
pub mod sweego;

pub use self::config::*;
