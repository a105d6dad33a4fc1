//! users-api library
//!
//! Core library modules for the users-api web application.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod mediator;
pub mod models;
pub mod pipeline;
pub mod repositories;
pub mod server;
pub mod services;
pub mod state;
pub mod users;
pub mod utils;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
