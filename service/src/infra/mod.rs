//! Infrastructure layer.

pub mod backend;

pub use self::backend::Backend;
#[cfg(feature = "rest")]
pub use self::backend::{rest, Rest};
