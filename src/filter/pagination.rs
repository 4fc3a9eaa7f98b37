/// 1-based page request as sent by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: i64,
    /// Rows per page; non-positive means "as many as allowed"
    pub page_size: i64,
}

impl Pagination {
    /// Page numbers at or below 1 are treated as the first page.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page: page.max(1), page_size }
    }

    /// Like [`Pagination::new`], but resolves the page size against `max`
    /// first: non-positive or oversized requests become `max`. The offset is
    /// then computed from the size actually served.
    pub fn capped(page: i64, page_size: i64, max: i64) -> Self {
        let max = max.max(1);
        let page_size = if page_size <= 0 || page_size > max { max } else { page_size };
        Self::new(page, page_size)
    }

    /// SQL OFFSET value: `(page - 1) * page_size`, never negative.
    pub fn offset(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(2, 10).offset(), 10);
        assert_eq!(Pagination::new(3, 25).offset(), 50);
    }

    #[test]
    fn clamps_page() {
        assert_eq!(Pagination::new(0, 10).page, 1);
        assert_eq!(Pagination::new(-4, 10).offset(), 0);
    }

    #[test]
    fn unbounded_page_size_has_no_offset() {
        assert_eq!(Pagination::new(5, 0).offset(), 0);
    }

    #[test]
    fn capped_offset_follows_served_size() {
        let p = Pagination::capped(2, 200, 100);
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 100);

        let p = Pagination::capped(3, 0, 50);
        assert_eq!(p.limit(), 50);
        assert_eq!(p.offset(), 100);

        assert_eq!(Pagination::capped(2, 10, 100).offset(), 10);
    }
}
