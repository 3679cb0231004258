//! Core data models for SolDash.

mod game;
mod pattern;

pub use game::*;
pub use pattern::*;
