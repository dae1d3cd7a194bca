//! Terminal sinks provided by the host framework.

use crate::error::ErrorRecord;
use crate::types::NormalizedAuthResult;

/// Receives the outcome of a login attempt.
///
/// Both methods take `self` by value, so a handler fires at most once.
pub trait AuthOutcomeHandler {
    type Output;

    fn on_success(self, result: NormalizedAuthResult) -> Self::Output;

    fn on_error(self, error: ErrorRecord) -> Self::Output;
}

/// Route a callback outcome to exactly one sink of `handler`.
pub fn dispatch<H: AuthOutcomeHandler>(
    outcome: Result<NormalizedAuthResult, ErrorRecord>,
    handler: H,
) -> H::Output {
    match outcome {
        Ok(result) => handler.on_success(result),
        Err(error) => handler.on_error(error),
    }
}
