//! Model session domain.
//!
//! - [`response::ModelResponse`]: candidates returned by the model client
//! - [`response::ContentPart`]: text, function-call or function-response part

pub mod response;
