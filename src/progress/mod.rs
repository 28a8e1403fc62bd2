//! # Progress Module
//!
//! Per-user learning counters (signs learned, practice time, streak) with
//! lazy creation on first read and a date-driven streak policy.

pub mod handlers;
pub mod models;
pub mod routes;

#[cfg(test)]
mod tests;

pub use routes::progress_routes;
