//! Shelfmark library circulation server
//!
//! A REST JSON API for a small library: catalog management, borrowing and
//! returns with a loan limit, tiered late fees and fee payment through an
//! external payment gateway.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
