//! # Users Module
//!
//! Profile and preferences for the authenticated user. Signup and
//! session lifecycle live in the auth module; everything here operates
//! on an already-resolved `AuthedUser`.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::user_routes;
