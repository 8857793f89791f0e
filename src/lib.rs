//! # Clario
//!
//! Personal productivity backend - tasks, calendar events, and mood tracking
//! for a single household of users, served over a REST API.
//!
//! ## Modules
//!
//! - [`store`]: SQLite-backed record store for users, tasks, events, and moods
//! - [`stats`]: Pure aggregation over in-memory record slices
//! - [`auth`]: Password hashing and bearer-token sessions
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML config files with environment overrides
//! - [`clock`]: Injected time source so handlers never read the wall clock directly
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clario::api::{serve, ApiConfig, AppState};
//! use clario::clock::SystemClock;
//! use clario::store::RecordStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(RecordStore::open("clario.db")?);
//!     let config = ApiConfig::default();
//!     let state = AppState::new(store, Arc::new(SystemClock), config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod stats;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use store::RecordStore;
