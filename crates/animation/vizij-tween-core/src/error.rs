//! Error types for keyframe scheduling and tween setup.

use serde::{Deserialize, Serialize};

/// Errors raised while declaring a tween or binding subjects to it.
///
/// Stepping itself never fails; every variant here is a configuration problem
/// the caller has to fix in the declaration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenError {
    /// A tracked property has no value at or before a keyframe and the subject
    /// does not provide an initial value either.
    #[error("Property '{property}' has no value at or before frame {frame}")]
    MissingProperty { property: String, frame: u32 },

    /// A subject's segment windows do not line up with the already bound subjects.
    #[error("Segment layout mismatch: expected {expected:?}, got {actual:?}")]
    SegmentMismatch {
        expected: Vec<(f32, f32)>,
        actual: Vec<(f32, f32)>,
    },

    /// The clock could not convert a time label into frames.
    #[error("Unresolved time label: {label}")]
    UnresolvedLabel { label: String },

    /// Configuration data was present but malformed.
    #[error("Invalid options: {reason}")]
    InvalidOptions { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl TweenError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingProperty { .. } | Self::SegmentMismatch { .. } => "schedule",
            Self::UnresolvedLabel { .. } => "clock",
            Self::InvalidOptions { .. } => "config",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let missing = TweenError::MissingProperty {
            property: "x".into(),
            frame: 4,
        };
        assert_eq!(missing.category(), "schedule");
        assert_eq!(
            missing.to_string(),
            "Property 'x' has no value at or before frame 4"
        );

        let label = TweenError::UnresolvedLabel {
            label: "soon".into(),
        };
        assert_eq!(label.category(), "clock");
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let converted: TweenError = err.into();
        assert!(matches!(converted, TweenError::Serialization { .. }));
    }
}
