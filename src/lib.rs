//! Lava chain indexer
//!
//! Polls a Lava node, turns block events into typed records and persists them
//! into a relational store, one atomic transaction per block.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod utils;
