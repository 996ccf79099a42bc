//! Doctor search for the DocFinder directory.
//!
//! [`filter`] turns untrusted query parameters into store predicates,
//! [`pagination`] slices results into the `{count, next, previous, results}`
//! envelope, and [`engine`] ties the two to a record store.

pub mod engine;
pub mod filter;
pub mod pagination;

pub use engine::{EngineError, SearchEngine, SearchPage};
pub use filter::{DoctorFilter, InvalidSortDirection, SortDirection};
pub use pagination::{Page, PageNumber, PageRequest, PaginationConfig, PaginationError};
