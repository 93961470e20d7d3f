//! Error type shared by the analysis components.

/// Failures reported by the zone classifier and the analysis pipeline.
///
/// Near-zero anchor separation is not an error: the angle map guards it with
/// a fallback denominator instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The image has no rows/columns, or no pixel passes the validity mask.
    EmptyImage,
    /// Clustering could not run or produced unusable centers.
    ClusteringFailure {
        /// Human-readable cause.
        reason: String,
    },
    /// The classifier configuration is unusable.
    InvalidConfig {
        /// Human-readable cause.
        reason: String,
    },
}

impl AnalysisError {
    pub(crate) fn clustering(reason: impl Into<String>) -> Self {
        Self::ClusteringFailure {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImage => write!(f, "image appears empty or too dark"),
            Self::ClusteringFailure { reason } => write!(f, "clustering failed: {}", reason),
            Self::InvalidConfig { reason } => write!(f, "invalid classifier config: {}", reason),
        }
    }
}

impl std::error::Error for AnalysisError {}
