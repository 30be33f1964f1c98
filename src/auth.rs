//! Credential models exchanged with the auth server.

pub mod secret;

pub use secret::*;
