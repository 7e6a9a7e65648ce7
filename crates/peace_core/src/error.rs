use thiserror::Error;

/// Failures of the matrix helpers backing the raycaster.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MathError {
    /// The named matrix has a zero (or non-finite) determinant.
    #[error("{0} matrix is singular and cannot be inverted")]
    SingularMatrix(&'static str),
}

/// Rejected time-of-day text.  Accepted form is `HH:MM` on a 24h clock with
/// exactly two digits per field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClockParseError {
    #[error("expected HH:MM, got {0:?}")]
    Format(String),

    #[error("hour {0} is outside 00..=23")]
    Hour(u32),

    #[error("minute {0} is outside 00..=59")]
    Minute(u32),
}
