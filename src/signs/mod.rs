//! # Signs Module
//!
//! The sign dictionary: paginated filter/search over reference data,
//! plus per-user favorites.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use models::Sign;
pub use routes::signs_routes;
