//! Spaced repetition engine for vocabulary study
//!
//! Cards come from vocabulary lists owned by the caller. The engine decides
//! which of them are due, orders a session, schedules each card after it is
//! rated, and keeps that state per list and study direction through a
//! pluggable [`storage::Storage`] backend.

pub mod config;
pub mod srs;
pub mod storage;

pub use config::SrsConfig;
