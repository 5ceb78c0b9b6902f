pub mod convert;
pub mod historical;
pub mod latest;
pub mod setup;
pub mod ui;
