//! ACRFD - application tracking client
//!
//! Library exports for the CLI, tests and external use.

pub mod config;
pub mod error;
pub mod services;
pub mod state;

pub use acrfd_models as models;
pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
