//! History provider abstractions.
//!
//! This module contains:
//! - The `HistoryProvider` trait the chart loader fetches through
//! - Request/response types for the backend's history endpoint
//! - `InMemoryHistoryProvider`, a canned provider for previews and tests
//!
//! Transport lives outside this crate. A provider only has to turn a
//! [`HistoryRequest`] into a [`HistoryResponse`]; `HistoryResponse::from_json`
//! parses the endpoint's body for HTTP-backed implementations.

mod memory;
mod traits;

pub use memory::InMemoryHistoryProvider;
pub use traits::{HistoryProvider, HistoryRequest, HistoryResponse};
