//! TVPSS Server
//!
//! REST JSON API for tracking the TVPSS (school TV production) capability
//! level of schools through district and state review, and for managing
//! school equipment, its follow-up notes, students and crew applications.

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
