//! Client core for the card deck shuffler service.
//!
//! # Overview
//! One operation: send a `ShuffleQuery` with an API key to the hosted
//! shuffle endpoint and hand back the JSON envelope. The shuffling happens
//! server-side.
//!
//! # Design
//! - `ShufflerClient` holds only immutable configuration and a shared
//!   transport, so it is cheap to clone and safe to call concurrently.
//! - The operation is split into `build_request` and `parse_response` so the
//!   I/O boundary is explicit; `execute` runs both around one round trip
//!   through a `Transport` (by default `UreqTransport`).
//! - `execute_async` and `execute_with` are the awaitable and callback forms
//!   of the same call.
//! - Query values are forwarded as given; range checks are the service's job.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::{ShufflerClient, API_KEY_HEADER};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Card, ShuffleMethod, ShuffleQuery, ShuffleResponse, ShuffleResult, Suit, UnknownMethod};
