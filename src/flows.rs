//! Auth server exchanges: service-account login, cluster token exchange, user-cluster lookup.
//!
//! Each operation is one linear sequence (build request, send, read body, validate, parse) with
//! no retries and no caching. Token clients keep the token from their most recent successful
//! call; a failed call clears it.

pub mod cluster_token;
pub mod service_account;
pub mod user_cluster;

mod common;

pub use cluster_token::*;
pub use service_account::*;
pub use user_cluster::*;
