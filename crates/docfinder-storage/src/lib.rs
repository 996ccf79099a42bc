//! # docfinder-storage
//!
//! Record store abstraction for the DocFinder directory.
//!
//! This crate defines the [`RecordStore`] trait and the query types passed to
//! it. Backends live in separate crates (`docfinder-db-memory`).
//!
//! ```ignore
//! use docfinder_storage::{DoctorQuery, Predicate, RecordStore, SortOrder};
//! use docfinder_core::DoctorField;
//!
//! let query = DoctorQuery::new()
//!     .with_predicate(Predicate::icontains(DoctorField::City, "austin"))
//!     .with_order(SortOrder::Desc)
//!     .with_limit(12);
//! let page = store.search_doctors(&query).await?;
//! ```

mod error;
mod traits;
mod types;

pub use error::StorageError;
pub use traits::RecordStore;
pub use types::{DoctorPage, DoctorQuery, MatchOp, Predicate, SortOrder, UpsertOutcome};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Shared handle to a record store backend.
pub type DynRecordStore = std::sync::Arc<dyn RecordStore>;
