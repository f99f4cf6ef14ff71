use serde::{Deserialize, Serialize};
use crate::Error;

/// Result of one user interaction, ready to be rendered.
///
/// Validation warnings, inference failures and initialization failures are
/// kept apart because the UI reacts differently to each: a warning asks for
/// input, an inference failure is shown and forgotten, an initialization
/// failure stops the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome<T> {
    Success { result: T },
    ValidationWarning { message: String },
    InferenceFailure { message: String },
    InitializationFailure { message: String },
}

impl<T> OperationOutcome<T> {
    pub fn success(result: T) -> Self {
        Self::Success { result }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::ValidationWarning { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// True for failures that should halt any further interaction.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InitializationFailure { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::ValidationWarning { message }
            | Self::InferenceFailure { message }
            | Self::InitializationFailure { message } => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationOutcome<U> {
        match self {
            Self::Success { result } => OperationOutcome::Success { result: f(result) },
            Self::ValidationWarning { message } => OperationOutcome::ValidationWarning { message },
            Self::InferenceFailure { message } => OperationOutcome::InferenceFailure { message },
            Self::InitializationFailure { message } => {
                OperationOutcome::InitializationFailure { message }
            }
        }
    }

    /// Builds a failure outcome from an error, prefixing the message with
    /// what the user was trying to do.
    pub fn from_error(context: &str, error: &Error) -> Self {
        match error {
            Error::Validation(message) => Self::ValidationWarning { message: message.clone() },
            Error::Initialization(_) => Self::InitializationFailure {
                message: format!("Error loading models: {}", error),
            },
            _ => Self::InferenceFailure {
                message: format!("Error {}: {}", context, error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_classifies() {
        let outcome: OperationOutcome<()> =
            OperationOutcome::from_error("analyzing sentiment", &Error::Inference("boom".into()));
        assert_eq!(
            outcome,
            OperationOutcome::InferenceFailure {
                message: "Error analyzing sentiment: Inference error: boom".to_string()
            }
        );

        let outcome: OperationOutcome<()> =
            OperationOutcome::from_error("analyzing sentiment", &Error::Initialization("no weights".into()));
        assert!(outcome.is_fatal());
        assert_eq!(
            outcome.message(),
            Some("Error loading models: Model initialization failed: no weights")
        );

        let outcome: OperationOutcome<()> =
            OperationOutcome::from_error("generating summary", &Error::Validation("empty".into()));
        assert_eq!(outcome, OperationOutcome::warning("empty"));
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let outcome = OperationOutcome::success(42);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["result"], 42);

        let outcome: OperationOutcome<i32> = OperationOutcome::warning("Please enter some text");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "validation_warning");
        assert_eq!(json["message"], "Please enter some text");
    }

    #[test]
    fn test_map_keeps_failures() {
        let outcome: OperationOutcome<i32> = OperationOutcome::InferenceFailure { message: "x".into() };
        let mapped = outcome.map(|n| n.to_string());
        assert_eq!(mapped, OperationOutcome::InferenceFailure { message: "x".into() });
        assert_eq!(OperationOutcome::success(2).map(|n| n * 2), OperationOutcome::success(4));
    }
}
