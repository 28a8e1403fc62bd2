//! # Translate Module
//!
//! Two translation paths funnel into one history log:
//! - speech -> text via the transcription adapter (HTTP multipart and a
//!   realtime WebSocket channel)
//! - text -> sign clips via dictionary lookup
//!
//! Every successful HTTP translation appends a history record.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod translation;
pub mod validators;
pub mod websocket;

#[cfg(test)]
mod tests;

pub use routes::translate_routes;
