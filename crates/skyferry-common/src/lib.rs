//! # skyferry-common
//!
//! Shared types, configuration, error handling, and the flight phase table used
//! across all Skyferry crates. No I/O lives here, only primitives and contracts.

pub mod auth;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod permissions;
pub mod phases;
pub mod validation;
