//! Client library for the dispatch controller.
//!
//! A thin wrapper over the controller's HTTP API: it constructs requests and
//! parses responses, with no retry and no validation beyond request
//! construction.

pub mod client;
pub mod error;

pub use client::DispatchClient;
pub use error::ClientError;
