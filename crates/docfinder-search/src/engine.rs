use docfinder_core::Doctor;
use docfinder_storage::{DoctorQuery, RecordStore, StorageError};
use thiserror::Error;
use url::Url;

use crate::filter::DoctorFilter;
use crate::pagination::{Page, PageNumber, PageRequest, PaginationError, resolve_page};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// One resolved page of a doctor search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub doctors: Vec<Doctor>,
    pub count: usize,
    pub number: usize,
    pub page_size: usize,
}

impl SearchPage {
    pub fn into_envelope(self, request_url: &Url) -> Page<Doctor> {
        Page::new(
            self.doctors,
            self.count,
            self.number,
            self.page_size,
            request_url,
        )
    }
}

pub struct SearchEngine;

impl SearchEngine {
    /// Runs a filtered search and returns the requested page.
    pub async fn execute(
        store: &dyn RecordStore,
        filter: &DoctorFilter,
        request: PageRequest,
    ) -> Result<SearchPage, EngineError> {
        let base = filter.to_query();
        let page_size = request.page_size.max(1);

        let number = match request.page {
            PageNumber::Number(n) => n,
            PageNumber::Last => {
                let total = store.search_doctors(&base.clone().with_limit(0)).await?.total;
                resolve_page(PageNumber::Last, total, page_size)?
            }
        };

        let query = DoctorQuery {
            offset: (number - 1).saturating_mul(page_size),
            limit: Some(page_size),
            ..base
        };
        let result = store.search_doctors(&query).await?;
        resolve_page(PageNumber::Number(number), result.total, page_size)?;

        tracing::debug!(
            count = result.total,
            page = number,
            page_size,
            "doctor search executed"
        );

        Ok(SearchPage {
            doctors: result.doctors,
            count: result.total,
            number,
            page_size,
        })
    }

    /// Every doctor matching the filter, in filter order.
    pub async fn all(
        store: &dyn RecordStore,
        filter: &DoctorFilter,
    ) -> Result<Vec<Doctor>, EngineError> {
        Ok(store.search_doctors(&filter.to_query()).await?.doctors)
    }
}
