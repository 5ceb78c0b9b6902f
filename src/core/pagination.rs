//! Fixed-size paging over ordered sequences

use serde::{Deserialize, Serialize};

use super::error::RateError;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// A validated page size and one-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page_size: usize,
    page_number: usize,
}

impl PageRequest {
    pub fn new(page_size: usize, page_number: usize) -> Result<Self, RateError> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) || page_number < 1 {
            return Err(RateError::InvalidPage {
                page_size,
                page_number,
            });
        }
        Ok(Self {
            page_size,
            page_number,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Slices `entries` to the requested page. A page past the end comes back
/// empty with the metadata still filled in.
pub fn paginate<T>(entries: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = entries.len();
    let page_size = request.page_size();
    let total_pages = total_count.div_ceil(page_size);
    let offset = (request.page_number() - 1).saturating_mul(page_size);

    let items = entries
        .into_iter()
        .skip(offset)
        .take(page_size)
        .collect();

    Page {
        items,
        total_count,
        page_size,
        current_page: request.page_number(),
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_middle_page() {
        let page = paginate(entries(25), PageRequest::new(10, 2).unwrap());
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate(entries(25), PageRequest::new(10, 3).unwrap());
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_page_past_end_is_empty_not_error() {
        let page = paginate(entries(25), PageRequest::new(10, 4).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.current_page, 4);
    }

    #[test]
    fn test_empty_series() {
        let page = paginate(Vec::<usize>::new(), PageRequest::default());
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_exact_multiple() {
        let page = paginate(entries(20), PageRequest::new(10, 2).unwrap());
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 10);
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(1, 1).is_ok());
        assert!(PageRequest::new(100, 1).is_ok());
        assert!(matches!(
            PageRequest::new(0, 1),
            Err(RateError::InvalidPage { .. })
        ));
        assert!(PageRequest::new(101, 1).is_err());
        assert!(PageRequest::new(10, 0).is_err());
    }
}
