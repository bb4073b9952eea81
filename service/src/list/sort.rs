//! Page-local [`Sort`]ing of a request list.

use std::cmp::Ordering;

use common::pagination::Order;
use strum::{Display, EnumString, IntoStaticStr};

use crate::read::ServiceRequest;

/// Key to sort [`ServiceRequest`]s by.
#[derive(
    Clone, Copy, Debug, Display, EnumString, Eq, Hash, IntoStaticStr, PartialEq,
)]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    /// [`ServiceRequest::created_at`].
    CreatedAt,

    /// [`ServiceRequest::updated_at`].
    UpdatedAt,

    /// [`ServiceRequest::due_date`].
    DueDate,

    /// Level of [`ServiceRequest::priority`].
    Priority,

    /// [`ServiceRequest::status`].
    Status,

    /// [`ServiceRequest::title`], case-insensitively.
    Title,
}

/// Sorting of the loaded page of [`ServiceRequest`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Sort {
    /// [`SortKey`] to sort by.
    pub key: SortKey,

    /// [`Order`] to sort in.
    pub order: Order,
}

impl Sort {
    /// Returns the [`Sort`] following this one after choosing the provided
    /// [`SortKey`].
    ///
    /// Choosing the current key again reverses the [`Order`], while a new key
    /// starts in [`Order::Descending`].
    #[must_use]
    pub fn toggle(current: Option<Self>, key: SortKey) -> Self {
        match current {
            Some(sort) if sort.key == key => Self {
                key,
                order: sort.order.reverse(),
            },
            Some(_) | None => Self {
                key,
                order: Order::Descending,
            },
        }
    }

    /// Sorts the provided [`ServiceRequest`]s in place.
    ///
    /// The sort is stable: equal requests keep the backend order.
    pub fn apply(self, requests: &mut [ServiceRequest]) {
        requests.sort_by(|a, b| {
            let ord = self.compare(a, b);
            match self.order {
                Order::Ascending => ord,
                Order::Descending => ord.reverse(),
            }
        });
    }

    /// Compares the provided [`ServiceRequest`]s by the [`SortKey`] in
    /// ascending order.
    fn compare(self, a: &ServiceRequest, b: &ServiceRequest) -> Ordering {
        match self.key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::DueDate => a.due_date.cmp(&b.due_date),
            SortKey::Priority => a.priority.level.cmp(&b.priority.level),
            SortKey::Status => {
                let rank = |r: &ServiceRequest| r.status.kind.map(|s| s.u8());
                rank(a)
                    .cmp(&rank(b))
                    .then_with(|| a.status.id.cmp(&b.status.id))
            }
            SortKey::Title => {
                a.title.to_lowercase().cmp(&b.title.to_lowercase())
            }
        }
    }
}
