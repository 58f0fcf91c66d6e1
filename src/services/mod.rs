//! # Business Logic Services
//!
//! - **Store** (`store`) - Read-only catalog storage behind a trait seam
//! - **Hierarchy** (`hierarchy`) - Ancestor chain resolution and aggregation

pub mod hierarchy;
pub mod store;
