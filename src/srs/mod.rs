//! Spaced repetition scheduling for vocabulary lists
//!
//! This module provides:
//! - SM-2 interval scheduling over three ratings (hard / good / easy)
//! - Session queue building (due backlog first, capped new cards)
//! - Per (list, study mode) persistence of card state
//! - A review session state machine tying them together

pub mod algorithm;
pub mod clock;
pub mod models;
pub mod queue;
pub mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use models::*;
pub use queue::{QueueBuilder, MAX_NEW_CARDS};
pub use session::{RateOutcome, SessionController, SessionError, SessionPhase};
pub use store::{state_key, CardStateStore, StateStoreError};
