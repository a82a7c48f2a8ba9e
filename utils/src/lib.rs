//! Shared utilities for the Verdict oracle protocol.

pub mod logging;

pub use logging::{init_tracing, try_init_tracing};
