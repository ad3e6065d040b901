//! Avaliare survey backend
//!
//! Companies authenticate, keep a profile, author surveys and collect
//! responses. Every API call is a named operation routed by the
//! [`services::Dispatcher`]; deletions cascade through the
//! company → survey → response hierarchy via [`services::CascadeService`].

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
