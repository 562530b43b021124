//! Page planning and ordered fan-out

use crate::error::{Error, Result};
use crate::types::Page;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;
use tracing::debug;

/// The pages needed to cover a result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    /// Rows reported by the probe request
    pub count: u64,
    /// Rows per page request
    pub page_size: u32,
    /// 1-based page numbers, ascending
    pub pages: Vec<u32>,
}

impl PagePlan {
    /// Check whether no page request is needed
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Number of pages of `page_size` rows needed for `count` rows
///
/// `count` comes from the server; a count needing more pages than fit in
/// a page number is rejected.
pub fn page_count(count: u64, page_size: u32) -> Result<u32> {
    if page_size == 0 {
        return Ok(0);
    }
    let pages = count.div_ceil(u64::from(page_size));
    u32::try_from(pages).map_err(|_| {
        Error::validation(format!(
            "a count of {count} rows needs {pages} pages, more than can be requested"
        ))
    })
}

/// Plan the page requests for `count` rows
pub fn plan(count: u64, page_size: u32) -> Result<PagePlan> {
    let pages = (1..=page_count(count, page_size)?).collect();
    Ok(PagePlan {
        count,
        page_size,
        pages,
    })
}

/// Fetch every planned page concurrently and concatenate the rows
///
/// At most `concurrency` requests are in flight (all of them when `None`).
/// The output holds page 1's rows first, then page 2's, and so on, no
/// matter in which order the responses arrive. The first failing page
/// aborts the whole fetch.
pub async fn gather_pages<T, F, Fut>(
    plan: &PagePlan,
    concurrency: Option<usize>,
    fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    if plan.is_empty() {
        return Ok(Vec::new());
    }

    let limit = concurrency.unwrap_or(plan.pages.len()).max(1);
    debug!(
        "Fetching {} pages of {} rows ({} in flight)",
        plan.pages.len(),
        plan.page_size,
        limit
    );

    let pages: Vec<Page<T>> = stream::iter(plan.pages.clone())
        .map(fetch)
        .buffered(limit)
        .try_collect()
        .await?;

    let mut rows = Vec::with_capacity(pages.iter().map(Page::len).sum());
    for page in pages {
        rows.extend(page.results);
    }
    Ok(rows)
}
