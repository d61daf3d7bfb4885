use thiserror::Error;

pub type RebinResult<T> = Result<T, RebinError>;

#[derive(Debug, Error)]
pub enum RebinError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown column index {index} (dataset has {available} columns)")]
    UnknownColumn { index: usize, available: usize },
}
