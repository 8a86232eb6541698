//! Repository layer — entity-scoped database operations.

mod appointment;
mod notification;
mod patient;
mod psychologist;

pub use appointment::*;
pub use notification::*;
pub use patient::*;
pub use psychologist::*;

/// Storage format for date-time columns.
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
