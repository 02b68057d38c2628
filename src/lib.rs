//! Turns a day's work-log entries into a 24 hour radial chart. Besides placing every entry on
//! the dial it measures how much the entries overlap and how much of the day they actually
//! cover.
//!

pub mod cli;
pub mod config;
pub mod engine;
pub mod provider;
pub mod session;
pub mod utils;
