//! Application services for sprint boards.

mod session;

pub use session::{BoardSession, BoardSnapshot};
