//! # Utility Modules
//!
//! - **Constants** (`constant`) - Engine limits and service defaults

pub mod constant;
