//! In-memory record store for the DocFinder directory.
//!
//! Implements [`RecordStore`] from `docfinder-storage` on top of papaya
//! lock-free HashMaps.
//!
//! ```ignore
//! use docfinder_db_memory::InMemoryStorage;
//! use docfinder_storage::RecordStore;
//!
//! let storage = InMemoryStorage::new();
//! storage.create_doctor(doctor).await?;
//! ```

mod query;
pub mod storage;

pub use docfinder_storage::{RecordStore, StorageError};
pub use storage::InMemoryStorage;
