//! Pagination and filtering for breeder listings
//!
//! ```rust
//! use breeder_service::repository::Pagination;
//!
//! let page = Pagination::new(20, Some(10));
//! assert_eq!(page.offset, 20);
//! assert_eq!(page.limit, Some(10));
//!
//! // No limit means "everything from offset onward"
//! assert_eq!(Pagination::default().limit, None);
//! ```

/// Offset/limit window over the insertion-ordered record list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Number of records to skip
    pub offset: u64,
    /// Maximum number of records to return; `None` returns the rest
    pub limit: Option<u64>,
}

impl Pagination {
    /// Create pagination with an offset and optional limit
    pub fn new(offset: u64, limit: Option<u64>) -> Self {
        Self { offset, limit }
    }

    /// Apply the window to an in-memory iterator.
    pub fn apply<I: Iterator>(&self, iter: I) -> impl Iterator<Item = I::Item> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        iter.skip(skip).take(take)
    }
}

/// Listing filter; absent fields do not restrict the result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreederFilter {
    /// Exact match on `breeder_city`
    pub breeder_city: Option<String>,
}

impl BreederFilter {
    pub fn by_city(city: impl Into<String>) -> Self {
        Self {
            breeder_city: Some(city.into()),
        }
    }

    /// Whether a record with this city passes the filter
    pub fn matches_city(&self, city: &str) -> bool {
        match self.breeder_city.as_deref() {
            Some(wanted) => wanted == city,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_window() {
        let page: Vec<_> = Pagination::new(1, Some(2)).apply(1..=5).collect();
        assert_eq!(page, vec![2, 3]);
    }

    #[test]
    fn test_apply_without_limit_returns_rest() {
        let page: Vec<_> = Pagination::new(3, None).apply(1..=5).collect();
        assert_eq!(page, vec![4, 5]);
    }

    #[test]
    fn test_apply_offset_past_end_is_empty() {
        assert_eq!(Pagination::new(10, Some(2)).apply(1..=5).count(), 0);
    }

    #[test]
    fn test_filter_matches_city() {
        assert!(BreederFilter::default().matches_city("Oslo"));
        assert!(BreederFilter::by_city("Oslo").matches_city("Oslo"));
        assert!(!BreederFilter::by_city("Oslo").matches_city("Bergen"));
    }
}
