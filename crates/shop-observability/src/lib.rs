//! Observability for the shop engine.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once
//! to install a human or JSON subscriber on stderr.

mod logging;

pub use logging::*;
