//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The pipeline's external dependencies (chain node, hardware device) are
//! abstracted behind traits. This crate provides test-friendly implementations
//! that:
//! - Return deterministic values
//! - Can be scripted and inspected programmatically
//! - Never touch the network or a USB device
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod hardware;

pub use chain::{NullChain, NullChainConnector};
pub use hardware::{NullHardwareConnector, NullHardwareDevice};

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
