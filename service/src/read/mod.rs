//! Read models definitions.

pub mod filter;
pub mod request;
pub mod summary;
pub mod ticket;

pub use self::{
    filter::Filters,
    request::ServiceRequest,
    summary::{QuickStats, RequestSummary},
};
