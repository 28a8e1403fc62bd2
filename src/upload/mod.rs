//! # Upload Module
//!
//! Thin delegation layer over the object storage adapter. Files are
//! received as multipart bodies, sniffed for their real content type,
//! and handed off; the returned URL is the only state the API keeps.

pub mod handlers;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::upload_routes;
