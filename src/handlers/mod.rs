//! # HTTP Request Handlers
//!
//! Read-only catalog endpoints.
//!
//! ## Available Handlers
//!
//! - **Categories** (`categories`) - Lookup, roots, children and ancestor chains
//! - **Products** (`products`) - Lookup, search, name suggestions, products per
//!   category and their merged hierarchies
//! - **Health Check** (`health_check`) - Application health monitoring

mod categories;
mod health_check;
mod products;

pub use categories::*;
pub use health_check::*;
pub use products::*;
