//! [`Pagination`] of a request list.

use common::pagination::{Limit, PageInfo};

/// Current page of a request list.
///
/// The page is always 1-based and never `0`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pagination {
    /// 1-based number of the current page.
    page: u32,

    /// [`Limit`] of items per page.
    limit: Limit,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Limit::default())
    }
}

impl Pagination {
    /// Creates a new [`Pagination`] at the first page.
    #[must_use]
    pub const fn new(limit: Limit) -> Self {
        Self { page: 1, limit }
    }

    /// Returns the 1-based number of the current page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the [`Limit`] of items per page.
    #[must_use]
    pub const fn limit(&self) -> Limit {
        self.limit
    }

    /// Moves to the provided `page`, optionally changing the [`Limit`].
    ///
    /// Changing the [`Limit`] moves to the first page, as the old page number
    /// means nothing for the new page size.
    pub fn update(&mut self, page: u32, limit: Option<Limit>) {
        match limit {
            Some(limit) if limit != self.limit => {
                self.limit = limit;
                self.page = 1;
            }
            Some(_) | None => self.page = page.max(1),
        }
    }

    /// Moves to the first page, keeping the [`Limit`].
    pub fn reset_on_filter_change(&mut self) {
        self.page = 1;
    }

    /// Moves to the first page with the provided [`Limit`].
    pub fn reset(&mut self, limit: Limit) {
        *self = Self::new(limit);
    }

    /// Computes the [`PageInfo`] of the current page among `total` items.
    #[must_use]
    pub fn info(&self, total: u64) -> PageInfo {
        PageInfo::new(self.page, self.limit, total)
    }
}

#[cfg(test)]
mod spec {
    use common::pagination::Limit;

    use super::Pagination;

    #[test]
    fn page_is_never_zero() {
        let mut pagination = Pagination::new(Limit::Ten);

        pagination.update(0, None);

        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn limit_change_resets_page() {
        let mut pagination = Pagination::new(Limit::Ten);
        pagination.update(4, None);
        assert_eq!(pagination.page(), 4);

        pagination.update(4, Some(Limit::Fifty));

        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), Limit::Fifty);
    }

    #[test]
    fn same_limit_keeps_requested_page() {
        let mut pagination = Pagination::new(Limit::Twenty);

        pagination.update(3, Some(Limit::Twenty));

        assert_eq!(pagination.page(), 3);
    }

    #[test]
    fn resets() {
        let mut pagination = Pagination::new(Limit::Ten);
        pagination.update(5, None);

        pagination.reset_on_filter_change();
        assert_eq!(pagination, Pagination::new(Limit::Ten));

        pagination.update(2, Some(Limit::Hundred));
        pagination.reset(Limit::Five);
        assert_eq!(pagination, Pagination::new(Limit::Five));
    }

    #[test]
    fn info_of_twelve_by_five() {
        let info = Pagination::new(Limit::Five).info(12);

        assert_eq!(info.total_pages, 3);
        assert_eq!((info.showing_from, info.showing_to), (1, 5));
    }
}
