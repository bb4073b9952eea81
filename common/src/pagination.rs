//! Abstractions for page-based pagination.

use std::fmt;

use derive_more::{Display, Error};

/// A page of items along with the total count of items matching the same
/// selection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// Total number of items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Converts items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Number of items requested per page.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Limit {
    /// 5 items per page.
    Five,

    /// 10 items per page.
    #[default]
    Ten,

    /// 20 items per page.
    Twenty,

    /// 50 items per page.
    Fifty,

    /// 100 items per page.
    Hundred,
}

impl Limit {
    /// All the allowed [`Limit`]s in ascending order.
    pub const ALL: [Self; 5] =
        [Self::Five, Self::Ten, Self::Twenty, Self::Fifty, Self::Hundred];

    /// Returns the number of items this [`Limit`] allows.
    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<u32> for Limit {
    type Error = InvalidLimit;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|l| l.get() == value)
            .ok_or(InvalidLimit(value))
    }
}

/// Error of a page size not being one of the allowed [`Limit`]s.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("page size `{_0}` is not one of 5, 10, 20, 50, 100")]
pub struct InvalidLimit(#[error(not(source))] pub u32);

/// Order of sorting.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    #[default]
    Descending,
}

impl Order {
    /// Returns the opposite [`Order`].
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Returns the wire representation of this [`Order`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Information about a page among all the pages of a selection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageInfo {
    /// 1-based number of the current page.
    pub page: u32,

    /// [`Limit`] of items per page.
    pub limit: Limit,

    /// Total number of items.
    pub total: u64,

    /// Total number of pages.
    pub total_pages: u64,

    /// 1-based position of the first item shown on the current page, or `0`
    /// if the page is empty.
    pub showing_from: u64,

    /// 1-based position of the last item shown on the current page, or `0`
    /// if the page is empty.
    pub showing_to: u64,

    /// Indicator whether there is a page after the current one.
    pub has_next_page: bool,

    /// Indicator whether there is a page before the current one.
    pub has_previous_page: bool,
}

impl PageInfo {
    /// Computes a [`PageInfo`] for the provided `page` of `total` items.
    #[must_use]
    pub fn new(page: u32, limit: Limit, total: u64) -> Self {
        let page = page.max(1);
        let per_page = u64::from(limit.get());
        let total_pages = total.div_ceil(per_page);

        let offset = u64::from(page - 1) * per_page;
        let (showing_from, showing_to) = if offset < total {
            (offset + 1, (offset + per_page).min(total))
        } else {
            (0, 0)
        };

        Self {
            page,
            limit,
            total,
            total_pages,
            showing_from,
            showing_to,
            has_next_page: u64::from(page) < total_pages,
            has_previous_page: page > 1,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Limit, PageInfo};

    #[test]
    fn limit_accepts_only_allowed_sizes() {
        for size in [5, 10, 20, 50, 100] {
            assert_eq!(Limit::try_from(size).unwrap().get(), size);
        }
        for size in [0, 1, 15, 25, 1000] {
            assert!(Limit::try_from(size).is_err());
        }
    }

    #[test]
    fn first_page_of_twelve_by_five() {
        let info = PageInfo::new(1, Limit::Five, 12);

        assert_eq!(info.total_pages, 3);
        assert_eq!(info.showing_from, 1);
        assert_eq!(info.showing_to, 5);
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);
    }

    #[test]
    fn last_partial_page() {
        let info = PageInfo::new(3, Limit::Five, 12);

        assert_eq!(info.showing_from, 11);
        assert_eq!(info.showing_to, 12);
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
    }

    #[test]
    fn empty_selection() {
        let info = PageInfo::new(1, Limit::Ten, 0);

        assert_eq!(info.total_pages, 0);
        assert_eq!((info.showing_from, info.showing_to), (0, 0));
        assert!(!info.has_next_page);
    }

    #[test]
    fn page_beyond_last() {
        let info = PageInfo::new(7, Limit::Twenty, 30);

        assert_eq!(info.total_pages, 2);
        assert_eq!((info.showing_from, info.showing_to), (0, 0));
        assert!(!info.has_next_page);
    }
}
