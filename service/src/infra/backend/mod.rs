//! [`Backend`]-related implementations.

#[cfg(feature = "rest")]
pub mod rest;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "rest")]
pub use self::rest::Rest;

/// Operation of the ticket backend.
pub use common::Handler as Backend;

/// [`Backend`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "rest")]
    /// [`Rest`] error.
    Rest(rest::Error),

    /// Error reported by a [`Backend`] not tied to any transport.
    #[display("`Backend` failed: {_0}")]
    #[from(ignore)]
    Other(#[error(not(source))] String),
}
