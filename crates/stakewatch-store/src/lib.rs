//! Storage layer: the record of filings already processed.
//!
//! [`SeenStore`] is the narrow interface the scan loop is written against.
//! [`MemoryStore`] backs tests and dry runs; [`DuckStore`] persists across
//! runs when the `duckdb` feature is enabled.

mod error;
mod memory;
mod seen;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use seen::{SeenStats, SeenStore};

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;
