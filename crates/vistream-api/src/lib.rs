//! Vistream API Library
//!
//! The HTTP surface of the streaming proxy: the stream pipeline, caller
//! authentication, error rendering and application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod stream;

pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, StreamSettings};
