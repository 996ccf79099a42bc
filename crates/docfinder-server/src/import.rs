//! Bulk doctor import from CSV, upserting by practitioner_id.

use std::io::Read;
use std::path::Path;

use docfinder_core::Doctor;
use docfinder_storage::{RecordStore, StorageError, UpsertOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics;

/// Columns expected in the header row.
pub const CSV_COLUMNS: [&str; 10] = [
    "practitioner_id",
    "first_name",
    "last_name",
    "specialization",
    "phone",
    "email",
    "address",
    "city",
    "state",
    "zip_code",
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV header is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub processed: usize,
    pub skipped: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DoctorRow {
    practitioner_id: String,
    first_name: String,
    last_name: String,
    specialization: String,
    phone: String,
    email: String,
    address: String,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
}

impl DoctorRow {
    fn into_doctor(self) -> Doctor {
        Doctor {
            practitioner_id: self.practitioner_id,
            first_name: self.first_name,
            last_name: self.last_name,
            specialization: self.specialization,
            phone: self.phone,
            email: self.email,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
        }
        .normalized()
    }
}

/// Reads every row first, then upserts. Rows without a practitioner_id and
/// rows that fail to parse are skipped.
pub async fn import_csv<R: Read>(
    store: &dyn RecordStore,
    reader: R,
) -> Result<ImportReport, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if !headers.iter().any(|h| h == CSV_COLUMNS[0]) {
        return Err(ImportError::MissingColumn(CSV_COLUMNS[0]));
    }

    let mut report = ImportReport::default();
    let mut doctors = Vec::new();
    for (line, row) in csv_reader.deserialize::<DoctorRow>().enumerate() {
        match row {
            Ok(row) if !row.practitioner_id.is_empty() => doctors.push(row.into_doctor()),
            Ok(_) => report.skipped += 1,
            Err(e) => {
                tracing::warn!(row = line + 1, error = %e, "skipping unreadable CSV row");
                report.skipped += 1;
            }
        }
    }

    let (mut created, mut updated) = (0usize, 0usize);
    for doctor in doctors {
        match store.upsert_doctor(doctor).await? {
            UpsertOutcome::Created => created += 1,
            UpsertOutcome::Updated => updated += 1,
        }
        report.processed += 1;
    }

    metrics::record_doctors_imported(report.processed as u64);
    tracing::info!(
        processed = report.processed,
        skipped = report.skipped,
        created,
        updated,
        "doctor import finished"
    );
    Ok(report)
}

/// Imports a CSV file from disk.
pub async fn import_file(
    store: &dyn RecordStore,
    path: impl AsRef<Path>,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    import_csv(store, bytes.as_slice()).await
}
