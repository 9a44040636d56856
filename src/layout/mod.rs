//! Layout module orchestrator.
//!
//! Box splitting lives in the private `core` module; callers import the
//! sizing types and the `rows`/`columns` helpers from here.

mod core;

pub use core::{Axis, LayoutItem, Sizing, columns, partition, resolve_sizes, rows, split};
