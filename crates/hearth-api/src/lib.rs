//! HTTP gateway client for the household aggregation backend.
//!
//! Every request the client makes flows through `ApiClient`: one round trip
//! per call, no retries and no caching. Controllers depend on the
//! `HouseholdBackend` trait rather than the concrete client so tests can
//! substitute in-memory fakes.

mod backend;
mod client;
mod error;

pub use backend::HouseholdBackend;
pub use client::{ApiClient, ApiClientConfig, DEFAULT_REQUEST_TIMEOUT_MS};
pub use error::RequestError;
