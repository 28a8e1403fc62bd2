//! # Auth Module
//!
//! Email/password authentication with server-side sessions:
//! - Signup with argon2 password hashing
//! - Login issuing a session-bound JWT bearer token
//! - Session resolution, refresh and logout
//! - AuthedUser / MaybeAuthedUser extractors for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use extractors::{AuthedUser, MaybeAuthedUser};
pub use models::User;
pub use routes::auth_routes;
