//! Offset pagination.

use serde::{Deserialize, Serialize};

/// Number of customers per listing page.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// A requested page (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Build a request for `page`, clamping anything below 1 to the first page.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Interpret a raw `page` query value. Missing, non-numeric and
    /// non-positive values all mean the first page.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(1);
        Self::new(page, DEFAULT_PER_PAGE)
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One page of results as returned by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Index of the last page; an empty collection still has one page.
    #[must_use]
    pub fn last_page(&self) -> u32 {
        let per_page = u64::from(self.request.per_page);
        let pages = self.total.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Navigation links of a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Position metadata of a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    /// 1-based index of the first item on this page, `None` when empty.
    pub from: Option<u64>,
    pub last_page: u32,
    pub path: String,
    pub per_page: u32,
    /// 1-based index of the last item on this page, `None` when empty.
    pub to: Option<u64>,
    pub total: u64,
}

/// Wire form of a page: `{data, links, meta}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Shape a store page for the wire.
    ///
    /// `path` is the absolute listing URL without a query string; `query`
    /// holds extra parameters (already URL-safe) that every link keeps.
    #[must_use]
    pub fn from_page(page: Page<T>, path: &str, query: &[(&str, String)]) -> Self {
        let current = page.request.page;
        let last = page.last_page();

        let link = |n: u32| {
            let mut url = format!("{path}?");
            for (key, value) in query {
                url.push_str(key);
                url.push('=');
                url.push_str(value);
                url.push('&');
            }
            url.push_str("page=");
            url.push_str(&n.to_string());
            url
        };

        let count = page.items.len() as u64;
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            let start = page.request.offset() + 1;
            (Some(start), Some(start + count - 1))
        };

        Self {
            links: PageLinks {
                first: link(1),
                last: link(last),
                prev: (current > 1).then(|| link(current - 1)),
                next: (current < last).then(|| link(current + 1)),
            },
            meta: PageMeta {
                current_page: current,
                from,
                last_page: last,
                path: path.to_owned(),
                per_page: page.request.per_page,
                to,
                total: page.total,
            },
            data: page.items,
        }
    }
}
