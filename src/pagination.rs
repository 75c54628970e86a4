use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 1-based page request. Zero values are clamped to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Build from optional query values, falling back to `default_size`.
    pub fn from_parts(page: Option<u32>, page_size: Option<u32>, default_size: u32) -> Self {
        Self::new(page.unwrap_or(1), page_size.unwrap_or(default_size))
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page.max(1) - 1)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// `has_more` holds when matches remain past this page: `total > skip + returned`.
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let has_more = total > pagination.skip() + items.len() as u64;
        Self { items, has_more }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_zero_on_first_page() {
        assert_eq!(Pagination::new(1, 20).skip(), 0);
        assert_eq!(Pagination::new(3, 20).skip(), 40);
    }

    #[test]
    fn zero_page_is_clamped() {
        let p = Pagination::new(0, 0);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn has_more_when_records_remain() {
        // 45 records, pages of 20: page 2 returns 20 and 5 remain
        let page = Page::new(vec![0; 20], 45, Pagination::new(2, 20));
        assert!(page.has_more);
    }

    #[test]
    fn no_more_on_exact_last_page() {
        let page = Page::new(vec![0; 20], 40, Pagination::new(2, 20));
        assert!(!page.has_more);
    }

    #[test]
    fn no_more_on_short_last_page() {
        let page = Page::new(vec![0; 5], 45, Pagination::new(3, 20));
        assert!(!page.has_more);
    }

    #[test]
    fn no_more_past_the_end() {
        let page: Page<u8> = Page::new(vec![], 10, Pagination::new(5, 20));
        assert!(!page.has_more);
    }

    #[test]
    fn from_parts_uses_default_size() {
        let p = Pagination::from_parts(None, None, 15);
        assert_eq!(p, Pagination::new(1, 15));
        let p = Pagination::from_parts(Some(4), Some(5), 15);
        assert_eq!(p, Pagination::new(4, 5));
    }
}
