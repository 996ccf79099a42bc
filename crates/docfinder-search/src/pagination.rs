//! Page-number pagination with absolute next/previous links.

use serde::Serialize;
use thiserror::Error;
use url::Url;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "page_size";
pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Invalid page.")]
    InvalidPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Which page the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(usize),
    /// `page=last`
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: PageNumber,
    pub page_size: usize,
}

impl PageRequest {
    /// Reads `page` and `page_size` from query pairs.
    ///
    /// A `page` that is neither a positive integer nor `last` is rejected. A
    /// `page_size` that does not parse to a positive integer falls back to the
    /// default and a larger one is capped at the maximum.
    pub fn from_pairs<'a, I>(pairs: I, config: &PaginationConfig) -> Result<Self, PaginationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut page = PageNumber::Number(1);
        let mut page_size = config.default_page_size;

        for (key, value) in pairs {
            match key {
                PAGE_PARAM => page = parse_page(value.trim())?,
                PAGE_SIZE_PARAM => {
                    page_size = match value.trim().parse::<usize>() {
                        Ok(0) | Err(_) => config.default_page_size,
                        Ok(n) => n.min(config.max_page_size),
                    }
                }
                _ => {}
            }
        }

        Ok(Self { page, page_size })
    }

    pub fn first(page_size: usize) -> Self {
        Self {
            page: PageNumber::Number(1),
            page_size,
        }
    }
}

fn parse_page(raw: &str) -> Result<PageNumber, PaginationError> {
    if raw == "last" {
        return Ok(PageNumber::Last);
    }
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(PaginationError::InvalidPage),
        Ok(n) => Ok(PageNumber::Number(n)),
    }
}

/// Number of pages for `count` items. An empty result still has one page.
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Resolves a requested page against the result size.
pub fn resolve_page(page: PageNumber, count: usize, page_size: usize) -> Result<usize, PaginationError> {
    let pages = page_count(count, page_size);
    match page {
        PageNumber::Last => Ok(pages),
        PageNumber::Number(n) if n <= pages => Ok(n),
        PageNumber::Number(_) => Err(PaginationError::InvalidPage),
    }
}

/// The paginated response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Builds the envelope for page `number` of a result with `count` items.
    ///
    /// Links are derived from `request_url`, keeping every other query
    /// parameter. The link back to page 1 drops `page` entirely.
    pub fn new(
        results: Vec<T>,
        count: usize,
        number: usize,
        page_size: usize,
        request_url: &Url,
    ) -> Self {
        let pages = page_count(count, page_size);
        let next = (number < pages).then(|| with_page(request_url, Some(number + 1)));
        let previous = (number > 1).then(|| {
            let target = number - 1;
            with_page(request_url, (target > 1).then_some(target))
        });

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Returns `url` with the `page` parameter replaced, or removed when `page`
/// is `None`. Other parameters keep their order.
fn with_page(url: &Url, page: Option<usize>) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != PAGE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if let Some(page) = page {
        pairs.push((PAGE_PARAM.to_string(), page.to_string()));
    }

    let mut link = url.clone();
    if pairs.is_empty() {
        link.set_query(None);
    } else {
        link.query_pairs_mut().clear().extend_pairs(pairs);
    }
    link.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::from_pairs([], &PaginationConfig::default()).unwrap();
        assert_eq!(req, PageRequest::first(12));
    }

    #[test]
    fn test_page_size_is_capped_and_falls_back() {
        let cfg = PaginationConfig::default();
        let req = PageRequest::from_pairs([("page_size", "500")], &cfg).unwrap();
        assert_eq!(req.page_size, 100);
        let req = PageRequest::from_pairs([("page_size", "abc")], &cfg).unwrap();
        assert_eq!(req.page_size, 12);
        let req = PageRequest::from_pairs([("page_size", "5")], &cfg).unwrap();
        assert_eq!(req.page_size, 5);
    }

    #[test]
    fn test_invalid_page_values() {
        let cfg = PaginationConfig::default();
        for raw in ["0", "-1", "two", ""] {
            assert_eq!(
                PageRequest::from_pairs([("page", raw)], &cfg).unwrap_err(),
                PaginationError::InvalidPage,
                "page={raw}"
            );
        }
        let req = PageRequest::from_pairs([("page", "last")], &cfg).unwrap();
        assert_eq!(req.page, PageNumber::Last);
    }

    #[test]
    fn test_resolve_page() {
        assert_eq!(page_count(0, 12), 1);
        assert_eq!(page_count(25, 12), 3);
        assert_eq!(resolve_page(PageNumber::Number(1), 0, 12), Ok(1));
        assert_eq!(resolve_page(PageNumber::Last, 25, 12), Ok(3));
        assert_eq!(
            resolve_page(PageNumber::Number(4), 25, 12),
            Err(PaginationError::InvalidPage)
        );
    }

    #[test]
    fn test_links_keep_other_params() {
        let request = url("http://localhost:8000/api/doctors/filter/?city=Austin&page=2");
        let page: Page<u8> = Page::new(vec![], 30, 2, 12, &request);
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8000/api/doctors/filter/?city=Austin&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("http://localhost:8000/api/doctors/filter/?city=Austin")
        );
    }

    #[test]
    fn test_single_page_has_no_links() {
        let request = url("http://localhost:8000/api/doctors/filter/");
        let page: Page<u8> = Page::new(vec![1, 2], 2, 1, 12, &request);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["count"], 2);
        assert!(json["next"].is_null());
    }

    #[test]
    fn test_previous_link_to_later_page_keeps_number() {
        let request = url("http://h/api/doctors/filter/?page=3");
        let page: Page<u8> = Page::new(vec![], 40, 3, 12, &request);
        assert_eq!(page.previous.as_deref(), Some("http://h/api/doctors/filter/?page=2"));
        assert_eq!(page.next.as_deref(), Some("http://h/api/doctors/filter/?page=4"));
    }
}
