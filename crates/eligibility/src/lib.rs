//! Eligibility service adapter.
//!
//! Turns the remote eligibility payload into a [`domain::Candidate`] and the
//! transport's failures into a fixed [`EligibilityError`] set:
//!
//! | Transport status | Error |
//! |---|---|
//! | 409 | `NotLatestLicence` |
//! | 429 | `TooManyRequests` |
//! | 5xx | `ServerError(code)` |
//! | 401, 403 | `AuthError(code)` (never retried) |
//! | 400, 404 | `LicenceNotFound` |
//! | anything else | `RetrieveError(cause)` |

pub mod error;
pub mod mapping;
pub mod memory;
pub mod payload;
pub mod service;

pub use error::{EligibilityError, TransportError};
pub use mapping::map_response;
pub use memory::InMemoryEligibilityTransport;
pub use payload::{EligibilityRequest, EligibilityResponse, RemoteAddress, RemoteEligibility};
pub use service::{EligibilityAdapter, EligibilityService, EligibilityTransport};
