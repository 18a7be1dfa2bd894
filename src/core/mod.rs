//! Core library components.
//!
//! The envelope core (`keys`, `cipher`, `envelope`, `resolver`, `registry`)
//! is pure: it works on in-memory values and performs no I/O. The remaining
//! modules read and write the project files around it.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod env;
pub mod envelope;
pub mod git;
pub mod identity;
pub mod keys;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod vault;
