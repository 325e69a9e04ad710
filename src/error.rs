use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError
{
    #[error("grid should be square and non-empty, got {rows}x{cols}")]
    InvalidShape { rows: usize, cols: usize },

    #[error("label store exhausted: capacity is {capacity} labels")]
    CapacityExceeded { capacity: usize },

    #[error("insufficient data: need at least {needed} values, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("bad fill probability {0}: should be in [0:1]")]
    InvalidProbability(f64),

    #[error("bad probability step {0}: should be positive")]
    InvalidStep(f64),

    #[error("not enough arguments: need filename containing parameters")]
    NotEnoughArguments,

    #[error("missing parameter: {0}")]
    MissingParameter(String),

    #[error("bad delimiter in line \"{0}\"")]
    BadDelimiter(String),

    #[error("could not parse \"{name}\" from \"{value}\"")]
    BadValue { name: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
