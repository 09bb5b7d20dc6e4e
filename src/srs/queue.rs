//! Session queue construction
//!
//! A queue is the due backlog followed by a capped batch of never-seen cards,
//! both in list order. Due cards are never capped, so a backlog can't be
//! starved by new material.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::models::{CardStates, ReviewOverview, VocabCard};

/// Default cap on never-seen cards admitted into one session
pub const MAX_NEW_CARDS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueBuilder {
    max_new_cards: usize,
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new(MAX_NEW_CARDS)
    }
}

impl QueueBuilder {
    pub fn new(max_new_cards: usize) -> Self {
        Self { max_new_cards }
    }

    pub fn max_new_cards(&self) -> usize {
        self.max_new_cards
    }

    /// Build the ordered working set for a session.
    ///
    /// A card id listed more than once is admitted only at its first position.
    pub fn build(
        &self,
        cards: &[VocabCard],
        states: &CardStates,
        now: DateTime<Utc>,
    ) -> Vec<VocabCard> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut due = Vec::new();
        let mut fresh = Vec::new();

        for card in cards {
            if !seen.insert(card.id.as_str()) {
                continue;
            }

            match states.get(&card.id) {
                Some(state) if state.is_due(now) => due.push(card.clone()),
                Some(_) => {}
                None if fresh.len() < self.max_new_cards => fresh.push(card.clone()),
                None => {}
            }
        }

        log::debug!(
            "Built queue: {} due, {} new (cap {})",
            due.len(),
            fresh.len(),
            self.max_new_cards
        );

        due.extend(fresh);
        due
    }
}

/// Uniformly permute a queue in place (Fisher-Yates)
pub fn shuffle<R: Rng + ?Sized>(queue: &mut [VocabCard], rng: &mut R) {
    queue.shuffle(rng);
}

/// Count cards by scheduling status for one mode
pub fn review_overview(
    cards: &[VocabCard],
    states: &CardStates,
    now: DateTime<Utc>,
) -> ReviewOverview {
    let mut overview = ReviewOverview::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for card in cards {
        if !seen.insert(card.id.as_str()) {
            continue;
        }
        overview.total_cards += 1;

        let Some(state) = states.get(&card.id) else {
            overview.new_cards += 1;
            continue;
        };

        if state.is_learning() {
            overview.learning_cards += 1;
        } else {
            overview.review_cards += 1;
        }

        if state.is_due(now) {
            overview.due_cards += 1;
        }

        overview.next_due = Some(match overview.next_due {
            Some(current) => current.min(state.next_review),
            None => state.next_review,
        });
    }

    overview
}
