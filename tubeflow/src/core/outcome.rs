//! Tagged stage outcome.

use super::StageStatus;
use crate::errors::TubeflowError;

/// The result of one pipeline stage.
///
/// `Degraded` carries fallback data that lets the run continue; `Fatal`
/// terminates the run.
#[derive(Debug, Clone)]
pub enum StageOutcome<T> {
    /// The stage produced generated output.
    Ok(T),
    /// The stage fell back to deterministic output.
    Degraded {
        /// The fallback output.
        data: T,
        /// Why the fallback was used.
        reason: String,
    },
    /// The stage failed and the run must stop.
    Fatal(TubeflowError),
}

impl<T> StageOutcome<T> {
    /// Creates a degraded outcome.
    #[must_use]
    pub fn degraded(data: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            data,
            reason: reason.into(),
        }
    }

    /// Returns true for `Ok`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns true for `Degraded`.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Returns true for `Fatal`.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Returns the stage status this outcome maps to.
    #[must_use]
    pub fn status(&self) -> StageStatus {
        match self {
            Self::Ok(_) => StageStatus::Ok,
            Self::Degraded { .. } => StageStatus::Degraded,
            Self::Fatal(_) => StageStatus::Failed,
        }
    }

    /// Returns the fallback reason or the fatal error message.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded { reason, .. } => Some(reason.clone()),
            Self::Fatal(err) => Some(err.to_string()),
        }
    }

    /// Borrows the data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok(data) | Self::Degraded { data, .. } => Some(data),
            Self::Fatal(_) => None,
        }
    }

    /// Splits into data and optional fallback reason, or the fatal error.
    pub fn into_result(self) -> Result<(T, Option<String>), TubeflowError> {
        match self {
            Self::Ok(data) => Ok((data, None)),
            Self::Degraded { data, reason } => Ok((data, Some(reason))),
            Self::Fatal(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_outcome() {
        let outcome = StageOutcome::Ok(3);
        assert!(outcome.is_ok());
        assert_eq!(outcome.status(), StageStatus::Ok);
        assert_eq!(outcome.data(), Some(&3));
        assert!(outcome.reason().is_none());
    }

    #[test]
    fn test_degraded_outcome() {
        let outcome = StageOutcome::degraded("fallback", "model returned prose");
        assert!(outcome.is_degraded());
        assert_eq!(outcome.status(), StageStatus::Degraded);
        assert_eq!(outcome.reason().as_deref(), Some("model returned prose"));

        let (data, reason) = outcome.into_result().unwrap();
        assert_eq!(data, "fallback");
        assert!(reason.is_some());
    }

    #[test]
    fn test_fatal_outcome() {
        let outcome: StageOutcome<()> =
            StageOutcome::Fatal(TubeflowError::Validation("bad url".into()));
        assert!(outcome.is_fatal());
        assert_eq!(outcome.status(), StageStatus::Failed);
        assert!(outcome.data().is_none());
        assert!(outcome.into_result().is_err());
    }
}
