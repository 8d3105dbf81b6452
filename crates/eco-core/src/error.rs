//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `EcoError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::FieldId;

/// The top-level error type for `eco-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EcoError {
    #[error("field {0} not found")]
    FieldNotFound(FieldId),

    #[error("no field named {0:?}")]
    UnknownFieldName(String),

    #[error("field {0:?} registered twice")]
    DuplicateField(String),

    #[error("invalid calendar position {year}-{month}: month must be in 0..=11")]
    InvalidCalendar { year: i32, month: u8 },

    #[error("field {name:?} has min {min} above max {max}")]
    InvalidBounds { name: String, min: f64, max: f64 },

    #[error("field {name:?} initial value {value} is outside its bounds")]
    InitialOutOfBounds { name: String, value: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `eco-*` crates.
pub type EcoResult<T> = Result<T, EcoError>;
