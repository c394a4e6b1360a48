//! Route tables.
//!
//! ```text
//! GET  /          code editor page
//! GET  /health    service health
//! POST /compile   run the calculator on submitted code
//! ```

pub mod compile;
pub mod health;
pub mod index;
