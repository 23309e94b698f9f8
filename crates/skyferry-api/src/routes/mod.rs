//! API route modules.

pub mod aircraft;
pub mod auth;
pub mod documents;
pub mod examples;
pub mod flights;
pub mod health;
pub mod inspections;
pub mod insurance;
pub mod organizations;
pub mod phases;
pub mod profile;
