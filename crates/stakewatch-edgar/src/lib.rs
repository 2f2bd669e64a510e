//! EDGAR access layer: locating the daily master index and fetching filing
//! documents over HTTP.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{EdgarClient, EdgarError, resolve_primary_document};
