//! Gemini adapter
//!
//! Talks to the `generateContent` REST endpoint with `reqwest`. The API is
//! stateless, so each [`GeminiSession`] keeps its own history and resends
//! it with every request.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;

pub use error::GeminiError;
pub use gateway::GeminiLlmGateway;
pub use session::GeminiSession;
