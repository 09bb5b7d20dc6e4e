//! SM-2 Spaced Repetition Algorithm
//!
//! Three-point variant of the SuperMemo 2 algorithm. Ratings are the
//! qualities 1 (hard), 3 (good) and 5 (easy) of the classical 0-5 scale.
//!
//! The first two successful reviews use fixed intervals of 1 and 6 days.
//! From the third on, the interval is multiplied by the card's ease factor.
//! A hard rating is a lapse: the card restarts at 1 day with zero
//! repetitions, and its ease factor is recomputed with the same formula as
//! any other rating rather than reset.

use chrono::{DateTime, Duration, Utc};

use super::models::{CardState, Quality};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Upper bound on any interval (100 years)
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

const FIRST_INTERVAL: u32 = 1;
const SECOND_INTERVAL: u32 = 6;

/// EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at 1.3
pub fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let miss = (5 - quality.value()) as f64;
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Apply a rating to a card's state, returning the new state.
///
/// `now` is the review time; the next review lands `interval` whole days later.
pub fn apply(state: &CardState, quality: Quality, now: DateTime<Utc>) -> CardState {
    let ease_factor = next_ease_factor(state.ease_factor, quality);

    let (interval, repetitions) = if quality.is_pass() {
        let repetitions = state.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => FIRST_INTERVAL,
            2 => SECOND_INTERVAL,
            // Grows by the ease held before this review
            _ => grow(state.interval, state.ease_factor.max(MIN_EASE_FACTOR)),
        };
        (interval, repetitions)
    } else {
        (FIRST_INTERVAL, 0)
    };

    CardState {
        word_id: state.word_id.clone(),
        interval,
        repetitions,
        ease_factor,
        next_review: now + Duration::days(interval as i64),
        last_quality: Some(quality),
    }
}

fn grow(interval: u32, ease_factor: f64) -> u32 {
    let grown = (interval as f64 * ease_factor).round();
    if grown >= MAX_INTERVAL_DAYS as f64 {
        MAX_INTERVAL_DAYS
    } else {
        grown as u32
    }
}

/// Intervals each rating would give, in `Quality::ALL` order (hard, good, easy).
/// Used to show users what a rating does before they pick it.
pub fn preview_intervals(state: &CardState, now: DateTime<Utc>) -> [u32; 3] {
    Quality::ALL.map(|quality| apply(state, quality, now).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn new_card_state() -> CardState {
        CardState::new("w1", now())
    }

    #[test]
    fn test_first_review_correct() {
        let result = apply(&new_card_state(), Quality::Good, now());

        assert_eq!(result.interval, 1);
        assert_eq!(result.repetitions, 1);
        assert_eq!(result.last_quality, Some(Quality::Good));
        assert_eq!(result.word_id, "w1");
    }

    #[test]
    fn test_second_review_correct() {
        let mut state = new_card_state();
        state.repetitions = 1;
        state.interval = 1;

        let result = apply(&state, Quality::Good, now());
        assert_eq!(result.interval, 6);
        assert_eq!(result.repetitions, 2);
    }

    #[test]
    fn test_subsequent_review_correct() {
        let mut state = new_card_state();
        state.repetitions = 5;
        state.interval = 10;
        state.ease_factor = 2.5;

        let result = apply(&state, Quality::Good, now());

        // 10 * 2.5 = 25
        assert_eq!(result.interval, 25);
        assert_eq!(result.repetitions, 6);
    }

    #[test]
    fn test_ease_factor_updates() {
        assert!((next_ease_factor(2.5, Quality::Easy) - 2.6).abs() < 1e-9);
        assert!((next_ease_factor(2.5, Quality::Good) - 2.36).abs() < 1e-9);
        assert!((next_ease_factor(2.5, Quality::Hard) - 1.96).abs() < 1e-9);
        assert_eq!(next_ease_factor(1.4, Quality::Hard), MIN_EASE_FACTOR);
    }

    #[test]
    fn test_next_review_is_whole_days_after_review() {
        let mut state = new_card_state();
        state.repetitions = 1;
        state.interval = 1;

        let result = apply(&state, Quality::Easy, now());
        let elapsed = result.next_review - now();
        assert_eq!(elapsed.num_milliseconds(), 6 * 86_400_000);
    }

    #[test]
    fn test_review_incorrect_resets_mature_card() {
        let mut state = new_card_state();
        state.repetitions = 5;
        state.interval = 30;
        state.ease_factor = 2.5;

        let result = apply(&state, Quality::Hard, now());

        assert_eq!(result.interval, 1);
        assert_eq!(result.repetitions, 0);
        assert!((result.ease_factor - 1.96).abs() < 1e-9);
        assert_eq!(result.next_review, now() + Duration::days(1));
    }

    #[test]
    fn test_hard_always_lapses() {
        let mut state = new_card_state();
        for (repetitions, interval) in [(0, 0), (1, 1), (2, 6), (9, 400)] {
            state.repetitions = repetitions;
            state.interval = interval;
            let result = apply(&state, Quality::Hard, now());
            assert_eq!((result.interval, result.repetitions), (1, 0));
        }
    }

    #[test]
    fn test_onboarding_sequence() {
        // 1, 6, then 6 x the ease held after the second rating
        let mut state = new_card_state();
        let mut intervals = Vec::new();
        for _ in 0..3 {
            let ease_before = state.ease_factor;
            state = apply(&state, Quality::Good, now());
            if intervals.len() == 2 {
                assert_eq!(state.interval, (6.0 * ease_before).round() as u32);
            }
            intervals.push(state.interval);
        }
        assert_eq!(intervals, vec![1, 6, 13]);
    }

    #[test]
    fn test_three_easy_ratings_a_day_apart() {
        let mut state = new_card_state();
        let mut intervals = Vec::new();
        for day in 0..3 {
            state = apply(&state, Quality::Easy, now() + Duration::days(day));
            intervals.push(state.interval);
        }

        assert_eq!(intervals, vec![1, 6, 16]);
        assert_eq!(state.next_review, now() + Duration::days(2 + 16));
    }

    #[test]
    fn test_ease_factor_minimum_over_any_sequence() {
        let mut state = new_card_state();
        let pattern = [
            Quality::Hard,
            Quality::Good,
            Quality::Hard,
            Quality::Hard,
            Quality::Easy,
            Quality::Good,
            Quality::Good,
            Quality::Hard,
        ];

        for quality in pattern.iter().cycle().take(200) {
            state = apply(&state, *quality, now());
            assert!(state.ease_factor >= MIN_EASE_FACTOR);
        }

        for _ in 0..20 {
            state = apply(&state, Quality::Good, now());
            assert!(state.ease_factor >= MIN_EASE_FACTOR);
        }
        assert_eq!(state.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_interval_is_capped() {
        let mut state = new_card_state();
        for _ in 0..60 {
            state = apply(&state, Quality::Easy, now());
        }
        assert_eq!(state.interval, MAX_INTERVAL_DAYS);
    }

    #[test]
    fn test_preview_intervals() {
        let mut state = new_card_state();
        state.repetitions = 3;
        state.interval = 10;
        state.ease_factor = 2.0;

        assert_eq!(preview_intervals(&state, now()), [1, 20, 20]);
        assert_eq!(preview_intervals(&new_card_state(), now()), [1, 1, 1]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
