//! The execution wrapper: persist source text, run the calculator against
//! it, and bound how long it may take.

pub mod output;
pub mod report;
pub mod request;
pub mod runner;
pub mod scratch;
pub mod subprocess;

pub use output::{ExecutionError, ExecutionOutput};
pub use report::{RunReport, RunStatus};
pub use request::ExecutionRequest;
pub use runner::{run, Runner};
pub use scratch::{ScratchFile, ScratchPolicy};
