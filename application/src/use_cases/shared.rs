//! Shared utilities for use cases.
//!
//! Cancellation checking and cancellable model interaction.

use crate::ports::llm_gateway::GatewayError;
use crate::use_cases::run_turn::RunTurnError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunTurnError::Cancelled)` if the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), RunTurnError> {
    if token.is_cancelled() {
        return Err(RunTurnError::Cancelled);
    }
    Ok(())
}

/// Await a model request unless the token fires first.
///
/// Dropping the request future abandons the HTTP exchange; the session
/// keeps whatever it recorded before sending.
pub(crate) async fn send_cancellable<T>(
    token: &CancellationToken,
    request: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, RunTurnError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(RunTurnError::Cancelled),
        result = request => result.map_err(RunTurnError::GatewayError),
    }
}
