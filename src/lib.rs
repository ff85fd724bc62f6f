//! Fishing village simulation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod economy;
