//! Blog API server: token-authenticated users and a slug-addressed `Blog`
//! resource over SQLite, with pluggable media storage.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod state;

pub use infrastructure::config::AppConfig;
pub use state::AppState;
