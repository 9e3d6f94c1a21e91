//! Application-level configuration.
//!
//! - [`ExecutionParams`]: turn loop control (tool round limit)

pub mod execution_params;

pub use execution_params::ExecutionParams;
