use crate::combination::ParamField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Parameter list '{field}' is empty")]
    EmptyParameterList { field: ParamField },

    #[error("Alpha and beta lists must both be given or both be omitted")]
    IncompleteRiskShape,

    #[error("Sweep size overflows usize")]
    SweepTooLarge,

    #[error("Unknown parameter field '{name}'")]
    UnknownField { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    /// Shorthand for the configuration-defect case raised by samplers
    /// and model constructors.
    pub fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}

pub type SimResult<T> = Result<T, SimError>;
