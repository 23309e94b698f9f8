//! Repository layer — query functions organized by table.

pub mod aircraft;
pub mod audit;
pub mod discrepancies;
pub mod documents;
pub mod examples;
pub mod flights;
pub mod insurance;
pub mod organizations;
pub mod profiles;
pub mod qualifications;
pub mod signoffs;
pub mod users;
