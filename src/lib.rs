//! Authgate - token-based authentication service
//!
//! This is the library interface for Authgate, exposing the credential
//! store, token issuer, and HTTP gateway for programmatic use.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;

pub use auth::{TokenIssuer, UserStore};
pub use config::Config;
pub use error::Error;
