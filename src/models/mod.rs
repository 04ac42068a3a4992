//! Core data models for match-history lookup.

pub mod lenient;

mod ids;
mod player;
mod raw_match;
mod view;

pub use ids::*;
pub use player::*;
pub use raw_match::*;
pub use view::*;
