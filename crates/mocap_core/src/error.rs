use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid reference range: low {low} > high {high}")]
    InvalidRange { low: f64, high: f64 },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("C3D error: {0}")]
    C3d(String),

    #[error("Unknown marker: {0}")]
    UnknownMarker(String),

    #[error("Frame {frame} out of range ({first}..={last})")]
    FrameOutOfRange { frame: usize, first: usize, last: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),
}

impl CoreError {
    /// Whether the error comes from the input data rather than the environment.
    pub fn is_data_error(&self) -> bool {
        match self {
            CoreError::Io(_) => false,
            CoreError::Csv(err) => !err.is_io_error(),
            CoreError::Yaml(_) | CoreError::InvalidConfig(_) => false,
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
