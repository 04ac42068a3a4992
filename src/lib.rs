//! # Match History
//!
//! Player match-history lookup: fetches a player's raw match collection,
//! groups it into calendar days and projects each match from the searched
//! player's point of view.
//!
//! ## Architecture
//!
//! - **models**: Raw match records, player profile/stats and derived views
//! - **projector**: Timestamp normalization, day grouping, per-player projection
//! - **view_state**: Which day is expanded
//! - **assets**: Icon paths with placeholder fallback
//! - **fetch**: Upstream sources (HTTP services, local JSON files)
//! - **render**: Plain-text output for the CLI
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod assets;
pub mod config;
pub mod fetch;
pub mod models;
pub mod projector;
pub mod render;
pub mod view_state;

pub use models::*;
