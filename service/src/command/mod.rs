//! [`Command`] definition.

pub mod execute_bulk_action;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::execute_bulk_action::ExecuteBulkAction;
