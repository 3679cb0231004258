//! # SolDash
//!
//! Jackpot round tracker with decile pattern analysis.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (game records, pattern results)
//! - **analysis**: Decile distributions, window comparison and insights
//! - **storage**: Filesystem game history (JSONL)
//! - **collect**: Fairness table scraping
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod analysis;
pub mod api;
pub mod collect;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
