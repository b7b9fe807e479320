//! Holds the current training result for downstream consumers.

use std::sync::Arc;

use crate::error::{Result, TrainError};
use crate::worker::FitResult;

/// Owns the most recent [`FitResult`] and gates access to it.
///
/// Evaluation and forecasting both need a trained model; the session turns
/// "nothing trained yet" into a typed error instead of a panic. Installing
/// a new result replaces the previous one wholesale, so readers holding an
/// [`Arc`] from before keep a consistent snapshot.
#[derive(Debug, Default, Clone)]
pub struct ForecastSession {
    result: Option<Arc<FitResult>>,
}

impl ForecastSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a trained model is available.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.result.is_some()
    }

    /// Install a fresh training result, replacing any previous one.
    pub fn install(&mut self, result: FitResult) {
        self.result = Some(Arc::new(result));
    }

    /// Drop the current result, if any.
    pub fn clear(&mut self) {
        self.result = None;
    }

    /// Get the current result.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::NotTrained`] when nothing has been installed.
    pub fn result(&self) -> Result<&Arc<FitResult>> {
        self.result.as_ref().ok_or(TrainError::NotTrained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_is_not_trained() {
        let session = ForecastSession::new();
        assert!(!session.is_trained());
        assert!(matches!(session.result(), Err(TrainError::NotTrained)));
    }
}
