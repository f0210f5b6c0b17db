use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Invalid attenuation coefficient: {0}. Must be finite and greater than 0.0")]
    InvalidAttenuation(f64),

    #[error("Invalid detector efficiency: {0}. Must be in (0.0, 1.0]")]
    InvalidDetectorEfficiency(f64),

    #[error("Invalid optical transmission: {0}. Must be in (0.0, 1.0]")]
    InvalidTransmission(f64),

    #[error("Invalid emission rate: {0}. Must be finite and greater than 0.0")]
    InvalidEmissionRate(f64),

    #[error("Invalid dark count rate: {0}. Must be finite and non-negative")]
    InvalidDarkCountRate(f64),

    #[error("Distance grid must contain at least one sample")]
    EmptyGrid,

    #[error("Invalid distance {value} at index {index}: must be finite and non-negative")]
    InvalidDistance { index: usize, value: f64 },

    #[error("Distance grid is not strictly increasing at index {index}")]
    UnorderedGrid { index: usize },

    #[error("Invalid grid bounds: start {start}, stop {stop}")]
    InvalidGridBounds { start: f64, stop: f64 },

    #[error("Invalid security threshold: {0}. Must be between 0.0 and 1.0")]
    InvalidThreshold(f64),

    #[error("Curve length ({curve}) does not match grid length ({grid})")]
    LengthMismatch { curve: usize, grid: usize },

    #[error("Degenerate sample: {0} observations, at least 2 are required")]
    DegenerateSample(usize),

    #[error("Non-finite sample value {value} at index {index}")]
    NonFiniteSample { index: usize, value: f64 },

    #[error("Invalid study configuration: {0}")]
    InvalidStudy(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionLogError {
    #[error("Line {line}: missing field '{field}'")]
    MissingField { line: usize, field: &'static str },

    #[error("Line {line}: invalid row number '{value}'")]
    InvalidRow { line: usize, value: String },

    #[error("Line {line}: invalid bit value '{value}'")]
    InvalidBit { line: usize, value: String },

    #[error("Line {line}: invalid detection flag '{value}'")]
    InvalidDetectionFlag { line: usize, value: String },
}
