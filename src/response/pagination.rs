//! Sequential collection of follow-up pages.
//!
//! When the first page of a listing call reports more than one page, the
//! remaining pages are fetched one at a time, in ascending order, and their
//! `results` are appended to the first page's. Any failing page aborts the
//! whole collection; nothing fetched so far is returned.

use std::future::Future;

use tracing::{debug, info};

use crate::response::normalize::NormalizedResult;

/// Scheduling state decided from the first page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSchedule {
    /// Nothing more to fetch.
    SinglePage,
    /// Pages `2..=pages` still have to be fetched.
    Paginating {
        /// Total page count reported by the first page.
        pages: u32,
    },
}

impl PageSchedule {
    /// Decides the schedule from a first page.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ebay_trading::response::PageSchedule;
    /// use ebay_trading::{NormalizedResult, Pagination};
    ///
    /// let first = NormalizedResult {
    ///     pagination: Some(Pagination { pages: 3, length: 25 }),
    ///     ..NormalizedResult::default()
    /// };
    /// assert_eq!(PageSchedule::for_first_page(&first), PageSchedule::Paginating { pages: 3 });
    /// assert_eq!(
    ///     PageSchedule::for_first_page(&NormalizedResult::default()),
    ///     PageSchedule::SinglePage
    /// );
    /// ```
    #[must_use]
    pub fn for_first_page(first: &NormalizedResult) -> Self {
        match first.pagination {
            Some(pagination) if pagination.pages >= 2 => Self::Paginating {
                pages: pagination.pages,
            },
            _ => Self::SinglePage,
        }
    }
}

/// Fetches the remaining pages of `first` and merges their results.
///
/// `fetch_page` is called with 2, 3, ... up to the reported page count, each
/// call awaited before the next starts. The merged result keeps the first
/// page's fields and `pagination`.
///
/// # Errors
///
/// Returns the first error produced by `fetch_page`.
pub async fn collect_pages<F, Fut, E>(
    first: NormalizedResult,
    mut fetch_page: F,
) -> Result<NormalizedResult, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<NormalizedResult, E>>,
{
    let PageSchedule::Paginating { pages } = PageSchedule::for_first_page(&first) else {
        return Ok(first);
    };

    info!("Collecting {} pages of results", pages);
    let mut merged = first;
    for page in 2..=pages {
        debug!("Fetching page {} of {}", page, pages);
        let next = fetch_page(page).await?;
        if let Some(results) = next.results {
            merged.results.get_or_insert_with(Vec::new).extend(results);
        }
    }

    Ok(merged)
}
