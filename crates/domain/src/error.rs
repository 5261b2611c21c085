//! Validation error types.

use thiserror::Error;

/// Errors raised while constructing value objects from user or remote input.
///
/// Licence failures deliberately carry no detail about which part of the
/// number was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Licence number was empty after trimming.
    #[error("Licence number is required")]
    EmptyLicence,

    /// Licence number did not match the accepted format(s).
    #[error("Not a valid licence number for either jurisdiction")]
    InvalidLicence,

    /// Text could not be read as a calendar date.
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    /// Year component of a date of birth is not a number or out of range.
    #[error("Invalid year: must be between {min} and {max}")]
    InvalidYear { min: i32, max: i32 },

    /// Month component of a date of birth is not in 1..=12.
    #[error("Invalid month: must be between 1 and 12")]
    InvalidMonth,

    /// Day component of a date of birth does not exist in that month.
    #[error("Invalid day: must be between 1 and {max}")]
    InvalidDay { max: u32 },

    /// Reference number was missing or blank.
    #[error("Reference number is required")]
    EmptyReference,

    /// Reference number contained something other than digits.
    #[error("Reference number must contain digits only")]
    NonNumericReference,

    /// Reference number was longer than the jurisdiction allows.
    #[error("Reference number must be at most {max} digits")]
    ReferenceTooLong { max: usize },
}
