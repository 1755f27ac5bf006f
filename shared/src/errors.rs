//! Shared error types for the share stress tooling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid size range: {min}..={max}")]
    InvalidSizeRange { min: u32, max: u32 },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
