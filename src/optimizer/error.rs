use thiserror::Error;

use crate::domain::NetworkError;

/// Errors raised while building or solving a flow model
///
/// An infeasible or unbounded model is not an error; it is reported through
/// [`OptimizationOutcome`](super::OptimizationOutcome).
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Invalid solve configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("LP solving requires the 'optimization' feature to be enabled")]
    Unsupported,
}
