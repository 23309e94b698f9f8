//! Domain models shared across all Skyferry crates.
//!
//! These are the rows the database stores and the bodies the API accepts and
//! serializes. Ids are UUID v7.

pub mod aircraft;
pub mod audit;
pub mod document;
pub mod flight;
pub mod inspection;
pub mod insurance;
pub mod organization;
pub mod qualification;
pub mod user;

pub use aircraft::*;
pub use audit::*;
pub use document::*;
pub use flight::*;
pub use inspection::*;
pub use insurance::*;
pub use organization::*;
pub use qualification::*;
pub use user::*;
