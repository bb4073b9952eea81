//! [`Query`] collection related to raw [`Ticket`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Ticket, Query};

use super::BackendQuery;

/// Queries a page of raw [`Ticket`]s.
pub type List =
    BackendQuery<By<read::ticket::list::Page, read::ticket::list::Query>>;

/// Queries [`read::ticket::Counts`] across the whole backend.
pub type Counts = BackendQuery<By<read::ticket::Counts, ()>>;
