//! Client for the board game catalog's XML API.
//!
//! Fetches a user's collection, logged plays and catalog records, handles
//! the API's queued/throttled responses, and can cache bodies on disk.

pub mod cache;
pub mod client;
pub mod error;
pub mod xml;

pub use cache::ResponseCache;
pub use client::{
    Backoff, BggClient, HttpResponse, HttpTransport, RetryPolicy, THING_BATCH_SIZE, Transport,
};
pub use error::BggError;
