//! Driving licence number value object.

use std::sync::LazyLock;

use common::Jurisdiction;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of a GB licence number without the trailing issue number.
pub const GB_LICENCE_LENGTH: usize = 16;

/// GB (DVLA) licence number layout:
///
/// ```text
/// JONES 0 61 10 2 W9 7 YT
/// │     │ │  │  │ │  │ └─ check letters
/// │     │ │  │  │ │  └─── computer check character (no I O Q Y Z 0 1)
/// │     │ │  │  │ └────── initials, '9' padded
/// │     │ │  │  └──────── year digit
/// │     │ │  └─────────── day of birth
/// │     │ └────────────── month of birth, +50 for female
/// │     └──────────────── decade digit
/// └────────────────────── surname, '9' padded to five
/// ```
static GB_LICENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[A-Z]{5}|[A-Z]{4}9|[A-Z]{3}9{2}|[A-Z]{2}9{3}|[A-Z]9{4})",
        r"[0-9]",
        r"(?:[05][1-9]|[16][0-2])",
        r"(?:0[1-9]|[12][0-9]|3[01])",
        r"[0-9]",
        r"(?:99|[A-Z][A-Z9])",
        r"[2-9A-HJ-NPR-X]",
        r"[A-Z]{2}$",
    ))
    .expect("invalid GB licence pattern")
});

static NI_LICENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("invalid NI licence pattern"));

/// A validated, normalized driving licence number.
///
/// Stored upper-cased with all whitespace removed, so equality is
/// effectively case-insensitive on the original input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenceNumber(String);

impl LicenceNumber {
    /// Parses and validates a licence number for the given jurisdiction.
    ///
    /// For Great Britain anything longer than 16 characters is truncated
    /// first, which tolerates an appended two-digit issue number. A GB parse
    /// also accepts a Northern Ireland number.
    pub fn parse(input: &str, jurisdiction: Jurisdiction) -> Result<Self, ValidationError> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            return Err(ValidationError::EmptyLicence);
        }

        match jurisdiction {
            Jurisdiction::NorthernIreland => {
                if NI_LICENCE.is_match(&normalized) {
                    Ok(Self(normalized))
                } else {
                    Err(ValidationError::InvalidLicence)
                }
            }
            Jurisdiction::GreatBritain => {
                let candidate: String = normalized.chars().take(GB_LICENCE_LENGTH).collect();
                if GB_LICENCE.is_match(&candidate) || NI_LICENCE.is_match(&candidate) {
                    Ok(Self(candidate))
                } else {
                    Err(ValidationError::InvalidLicence)
                }
            }
        }
    }

    /// Returns true if the normalized value has the GB 16-character shape.
    pub fn is_gb_format(&self) -> bool {
        GB_LICENCE.is_match(&self.0)
    }

    /// Returns the normalized licence number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against raw text, ignoring ASCII case and surrounding whitespace.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl std::fmt::Display for LicenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LicenceNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
