//! # fruitpunch-api
//!
//! Typed HTTP JSON client for the FruitPunchFS service.
//!
//! The service speaks plain request/response JSON against a configured base
//! address. This crate wraps that channel: it encodes a request body, decodes
//! the response into a typed record, and translates failures into [`Error`].
//!
//! ```ignore
//! use fruitpunch_api::ApiClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Ping { message: String }
//!
//! let client = ApiClient::new("http://localhost:5000")?;
//! let ping: Ping = client.get("")?;
//! ```
//!
//! No retry or timeout policy is defined here beyond the transport's default
//! request timeout; callers decide whether to retry.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{ReqwestTransport, Transport};
pub use types::{ApiRequest, ApiResponse, Method};
