//! # API Module
//!
//! HTTP endpoints for the local callback server that backs the interactive
//! authorization flow.
//!
//! - [`callback`] - receives the authorization code from the consent
//!   redirect and exchanges it for a token pair
//! - [`health`] - health check returning application status and version
//!
//! The server only runs for the duration of `chartsync auth`; the exchanged
//! token is handed back to the auth flow through shared state.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
