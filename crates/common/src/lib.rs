//! Shared types for the identity reconciliation workspace.
//!
//! Every other crate depends on these: the CRM identifier newtype and the
//! closed set of jurisdictions, agencies, locales and journeys.

pub mod types;

pub use types::{Agency, CrmId, Journey, Jurisdiction, Locale, UnknownVariant};
