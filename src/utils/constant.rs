//! # Application Constants
//!
//! Limits and defaults used by the hierarchy engine and the HTTP layer.

/// Longest chain a single walk will build.
///
/// A walk that gets this deep is treated as corrupt (cyclic or runaway)
/// parent data and is truncated.
pub const MAX_CHAIN_DEPTH: usize = 256;

/// Maximum number of ids accepted in one request body.
pub const MAX_REQUEST_IDS: u64 = 500;

/// Listen address when `BIND_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8090";

/// Maximum number of distinct names returned by product name suggestions.
pub const MAX_NAME_SUGGESTIONS: usize = 10;

/// Longest search term accepted by the product search endpoints.
pub const MAX_SEARCH_TERM_LENGTH: u64 = 200;
