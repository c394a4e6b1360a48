//! Calculator runner core.
//!
//! Persists submitted source text to a scratch file, runs the external
//! calculator binary against it with a wall-clock bound, and captures what
//! the binary printed. Contains no HTTP types so it can be tested in
//! isolation.

pub mod error;
pub mod execution;
