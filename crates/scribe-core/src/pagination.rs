//! Page arithmetic for feeds.
//!
//! A requested page number is resolved against the item count before any rows
//! are fetched: missing or malformed numbers resolve to the first page, numbers
//! past the end to the last page. An empty listing has one empty page.

/// Posts shown per feed page.
pub const POSTS_PER_PAGE: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
}

/// The resolved slice of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        if count == 0 {
            1
        } else {
            count.div_ceil(self.per_page)
        }
    }

    /// Resolve the raw `page` query value against `count` items.
    pub fn window(&self, count: u64, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = match requested.map(str::trim) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n > num_pages as i64 => num_pages,
                Ok(n) if n >= 1 => n as u64,
                Ok(_) => 1,
                // Too many digits for i64 is still past the end.
                Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
                    num_pages
                }
                Err(_) => 1,
            },
            None => 1,
        };

        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    /// Total items across all pages.
    pub count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, count: u64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            count,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then_some(self.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
        }
    }
}
