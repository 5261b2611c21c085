//! Domain layer for candidate identity reconciliation.
//!
//! This crate provides the value objects every other layer builds on:
//! - `LicenceNumber`: jurisdiction-aware driving licence parsing
//! - `CalendarDate` and `DateOfBirthRules`: normalized days, date-of-birth
//!   composition and business-day arithmetic
//! - `ReferenceNumber`: instructor personal reference / payment receipt numbers
//! - `Candidate`: the projection of an eligibility record

pub mod candidate;
pub mod date;
pub mod error;
pub mod licence;
pub mod reference;
pub mod test_type;

pub use candidate::{Address, Candidate, CandidateDetails, Eligibility};
pub use date::{CalendarDate, DateOfBirthRules, days_in_month};
pub use error::ValidationError;
pub use licence::LicenceNumber;
pub use reference::ReferenceNumber;
pub use test_type::TestType;
