//! Review session state machine
//!
//! A session walks a built queue one card at a time:
//!
//! ```text
//! Presenting --reveal--> Revealed --rate--> Presenting (next card)
//!     |                                 \--> Complete (summary)
//!     \--rate--------------------------------^
//! ```
//!
//! An empty queue starts in `NothingToStudy`. Inputs come from outside, so a
//! whole session can be driven without any UI.
//!
//! Every rating is written through to the store. A failed write does not stop
//! the session: scheduling carries on in memory and the session records a
//! warning that progress is no longer durable. If the initial read failed,
//! nothing is written until a later load succeeds, so a partial map never
//! replaces progress that is still on disk.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use super::algorithm::{self, preview_intervals};
use super::clock::{Clock, SystemClock};
use super::models::{
    CardState, CardStates, Quality, ReviewOverview, SessionStats, SessionSummary, StudyMode,
    VocabCard,
};
use super::queue::{self, QueueBuilder};
use super::store::{CardStateStore, StateStoreError};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Current card shown, answer hidden
    Presenting,
    /// Current card shown with its answer
    Revealed,
    /// Every queued card has been rated
    Complete,
    /// The queue was empty when built
    NothingToStudy,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while the session is {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// What a rating did
#[derive(Debug, Clone)]
pub struct RateOutcome {
    pub card: VocabCard,
    pub state: CardState,
    /// False if the write to storage failed
    pub persisted: bool,
    /// Set when this rating finished the session
    pub summary: Option<SessionSummary>,
}

pub struct SessionController<S: Storage, C: Clock = SystemClock> {
    list_id: String,
    mode: StudyMode,
    cards: Vec<VocabCard>,
    store: CardStateStore<S>,
    clock: C,
    builder: QueueBuilder,
    states: CardStates,
    queue: Vec<VocabCard>,
    index: usize,
    phase: SessionPhase,
    stats: SessionStats,
    touched: HashSet<String>,
    summary: Option<SessionSummary>,
    warnings: Vec<String>,
    degraded: bool,
    /// Stored state could not be read; in-memory state is incomplete
    read_failed: bool,
}

impl<S: Storage> SessionController<S, SystemClock> {
    /// Start a session on the wall clock with the default new-card cap
    pub fn start(
        list_id: impl Into<String>,
        mode: StudyMode,
        cards: Vec<VocabCard>,
        store: CardStateStore<S>,
    ) -> Self {
        Self::start_with(list_id, mode, cards, store, SystemClock, QueueBuilder::default())
    }
}

impl<S: Storage, C: Clock> SessionController<S, C> {
    pub fn start_with(
        list_id: impl Into<String>,
        mode: StudyMode,
        cards: Vec<VocabCard>,
        store: CardStateStore<S>,
        clock: C,
        builder: QueueBuilder,
    ) -> Self {
        let mut session = Self {
            list_id: list_id.into(),
            mode,
            cards,
            store,
            clock,
            builder,
            states: CardStates::new(),
            queue: Vec::new(),
            index: 0,
            phase: SessionPhase::NothingToStudy,
            stats: SessionStats::default(),
            touched: HashSet::new(),
            summary: None,
            warnings: Vec::new(),
            degraded: false,
            read_failed: false,
        };
        session.reload();
        session
    }

    // ==================== Accessors ====================

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &CardStateStore<S> {
        &self.store
    }

    pub fn queue(&self) -> &[VocabCard] {
        &self.queue
    }

    /// Zero-based position of the current card in the queue
    pub fn position(&self) -> usize {
        self.index
    }

    /// Cards not yet rated, including the current one
    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.index)
    }

    pub fn states(&self) -> &CardStates {
        &self.states
    }

    pub fn state_of(&self, word_id: &str) -> Option<&CardState> {
        self.states.get(word_id)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// The summary, once the session is complete
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Whether progress since the last load may not have been persisted
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Hand pending warnings to the caller
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// The card being studied, if any
    pub fn current_card(&self) -> Option<&VocabCard> {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Revealed => self.queue.get(self.index),
            SessionPhase::Complete | SessionPhase::NothingToStudy => None,
        }
    }

    /// Intervals each rating would give the current card, in hard/good/easy order
    pub fn preview(&self) -> Option<[u32; 3]> {
        let card = self.current_card()?;
        let now = self.clock.now();
        let state = self
            .states
            .get(&card.id)
            .cloned()
            .unwrap_or_else(|| CardState::new(card.id.clone(), now));
        Some(preview_intervals(&state, now))
    }

    /// Scheduling overview of the whole list under this session's mode
    pub fn overview(&self) -> ReviewOverview {
        queue::review_overview(&self.cards, &self.states, self.clock.now())
    }

    // ==================== Transitions ====================

    /// Show the answer of the current card
    pub fn reveal(&mut self) -> Result<&VocabCard> {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Revealed => {
                self.phase = SessionPhase::Revealed;
                Ok(&self.queue[self.index])
            }
            phase => Err(SessionError::InvalidTransition {
                action: "reveal",
                phase,
            }),
        }
    }

    /// Rate the current card and advance.
    ///
    /// Accepted whether or not the answer was revealed first.
    pub fn rate(&mut self, quality: Quality) -> Result<RateOutcome> {
        let card = match self.phase {
            SessionPhase::Presenting | SessionPhase::Revealed => self.queue[self.index].clone(),
            phase => {
                return Err(SessionError::InvalidTransition {
                    action: "rate",
                    phase,
                })
            }
        };

        let now = self.clock.now();
        let previous = self
            .states
            .get(&card.id)
            .cloned()
            .unwrap_or_else(|| CardState::new(card.id.clone(), now));
        let state = algorithm::apply(&previous, quality, now);
        self.states.insert(card.id.clone(), state.clone());

        let persisted = if self.read_failed {
            false
        } else {
            match self.store.save(&self.list_id, self.mode, &self.states) {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("Failed to save progress for {}: {}", self.list_id, err);
                    self.degrade(&err);
                    false
                }
            }
        };

        self.stats.record(quality);
        self.touched.insert(card.id.clone());
        self.index += 1;

        log::debug!(
            "Rated {} as {}: interval {}d, ease {:.2}",
            card.id,
            quality,
            state.interval,
            state.ease_factor
        );

        let summary = if self.index >= self.queue.len() {
            let summary = self.summarize();
            log::info!(
                "Session complete for {} ({}): {} reviewed",
                self.list_id,
                self.mode,
                summary.total_reviewed
            );
            self.summary = Some(summary.clone());
            self.phase = SessionPhase::Complete;
            Some(summary)
        } else {
            self.phase = SessionPhase::Presenting;
            None
        };

        Ok(RateOutcome {
            card,
            state,
            persisted,
            summary,
        })
    }

    /// Randomly reorder the cards not yet rated. Rated cards leave the queue.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Revealed => {
                self.queue.drain(..self.index);
                self.index = 0;
                queue::shuffle(&mut self.queue, rng);
                self.phase = SessionPhase::Presenting;
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition {
                action: "shuffle",
                phase,
            }),
        }
    }

    /// Reload stored state and rebuild the queue from scratch
    pub fn restart(&mut self) {
        log::info!("Restarting session for {} ({})", self.list_id, self.mode);
        self.reload();
    }

    /// Erase all progress for this list and mode, then start over
    pub fn hard_reset(&mut self) {
        match self.store.reset(&self.list_id, self.mode) {
            // Storage now matches the empty in-memory state
            Ok(()) => self.read_failed = false,
            Err(err) => {
                log::warn!("Failed to reset stored progress for {}: {}", self.list_id, err);
                self.degrade(&err);
            }
        }

        self.states.clear();
        self.rebuild();
    }

    /// Study the other direction. Loads that mode's own state.
    pub fn switch_mode(&mut self, mode: StudyMode) {
        if mode == self.mode {
            return;
        }

        log::info!("Switching {} from {} to {}", self.list_id, self.mode, mode);
        self.mode = mode;
        self.reload();
    }

    /// Summary of ratings so far. Final once the session is complete.
    pub fn summarize(&self) -> SessionSummary {
        let next_review = self
            .touched
            .iter()
            .filter_map(|id| self.states.get(id))
            .map(|state| state.next_review)
            .min();

        SessionSummary {
            total_reviewed: self.stats.total(),
            counts: self.stats,
            next_review,
        }
    }

    // ==================== Internals ====================

    fn reload(&mut self) {
        self.degraded = false;
        self.read_failed = false;
        self.states = match self.store.try_load(&self.list_id, self.mode) {
            Ok(states) => states,
            Err(err) => {
                log::warn!("Starting {} ({}) with empty state: {}", self.list_id, self.mode, err);
                if matches!(err, StateStoreError::Unavailable { .. }) {
                    self.read_failed = true;
                    self.degrade(&err);
                } else {
                    self.warnings
                        .push(format!("Saved progress was unreadable and has been ignored: {}", err));
                }
                CardStates::new()
            }
        };
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let now: DateTime<Utc> = self.clock.now();
        self.queue = self.builder.build(&self.cards, &self.states, now);
        self.index = 0;
        self.stats = SessionStats::default();
        self.touched.clear();
        self.summary = None;
        self.phase = if self.queue.is_empty() {
            SessionPhase::NothingToStudy
        } else {
            SessionPhase::Presenting
        };
    }

    fn degrade(&mut self, err: &StateStoreError) {
        if !self.degraded {
            self.warnings.push(format!(
                "Progress is not being saved and will be lost when the session ends: {}",
                err
            ));
        }
        self.degraded = true;
    }
}
