//! Instructor reference numbers.

use common::Jurisdiction;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of a GB personal reference number.
pub const PERSONAL_REFERENCE_MAX_LENGTH: usize = 6;

/// Maximum length of an NI payment receipt number.
pub const PAYMENT_RECEIPT_MAX_LENGTH: usize = 16;

/// An instructor's reference number.
///
/// In Great Britain this is the personal reference number (at most 6
/// digits); in Northern Ireland it is the payment receipt number (at most 16
/// digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    /// Validates and wraps a reference number.
    pub fn parse(value: Option<&str>, jurisdiction: Jurisdiction) -> Result<Self, ValidationError> {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyReference);
        }

        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::NonNumericReference);
        }

        let max = Self::max_length(jurisdiction);
        if trimmed.len() > max {
            return Err(ValidationError::ReferenceTooLong { max });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns `Ok(())` if the value would parse.
    pub fn is_valid(value: Option<&str>, jurisdiction: Jurisdiction) -> Result<(), ValidationError> {
        Self::parse(value, jurisdiction).map(|_| ())
    }

    /// Longest reference accepted for a jurisdiction.
    pub fn max_length(jurisdiction: Jurisdiction) -> usize {
        match jurisdiction {
            Jurisdiction::GreatBritain => PERSONAL_REFERENCE_MAX_LENGTH,
            Jurisdiction::NorthernIreland => PAYMENT_RECEIPT_MAX_LENGTH,
        }
    }

    /// Returns the reference digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
