use qsim_core::QsimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] QsimError),
}

pub type DriverResult<T> = Result<T, DriverError>;
