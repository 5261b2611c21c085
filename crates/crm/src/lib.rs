//! CRM store adapter.
//!
//! The CRM mirrors a subset of the eligibility record on two entities, a
//! candidate and a licence. This crate defines the store interface the
//! reconciler writes through, the record shapes it reads back, and an
//! in-memory implementation that logs every call.

pub mod error;
pub mod memory;
pub mod records;
pub mod store;

pub use error::CrmStoreError;
pub use memory::InMemoryCrmStore;
pub use records::{
    CrmAddress, CrmCandidateFields, CrmCandidateRecord, CrmLicenceCandidate, CrmLicenceRecord,
};
pub use store::{CrmOperation, CrmStore};
