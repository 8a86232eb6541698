pub mod appointment;
pub mod enums;
pub mod notification;
pub mod patient;
pub mod psychologist;

pub use appointment::*;
pub use enums::*;
pub use notification::*;
pub use patient::*;
pub use psychologist::*;
