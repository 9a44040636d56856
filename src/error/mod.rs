//! Error module orchestrator.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! lives in the private `types` module.

mod types;

pub use types::{CanvasError, Result};
