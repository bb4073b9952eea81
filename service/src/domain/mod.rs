//! Domain definitions.

pub mod bulk;
pub mod ticket;

pub use self::ticket::Ticket;
