//! Shared utilities for the FBX workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
