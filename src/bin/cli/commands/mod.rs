pub mod reset;
pub mod status;
pub mod study;
