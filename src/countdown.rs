//! Time-remaining calculator and 1 s display refresh loop.
//!
//! `compute_remaining_until` is pure and takes injected timestamps so it can
//! be exercised natively under `cargo test`; only `CountdownLoop` touches the
//! browser. The loop pins its target instant once per session (the next
//! January 1st as of session start) and rereads the wall clock every tick, so
//! a system clock adjustment simply yields a corrected value on the next tick
//! and the completion flag, once raised, never drops again.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use wasm_bindgen::JsValue;

use crate::timer::Interval;

/// Decomposition of the delta to the target instant. Hours, minutes and
/// seconds are bounded (23 / 59 / 59); days is only bounded below.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Total whole seconds represented by this decomposition.
    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400
            + i64::from(self.hours) * 3_600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds)
    }
}

/// Midnight, January 1st of the year after `now`, in the same (local civil)
/// timeline as `now`. Panics only if the clock reading is so corrupt that the
/// successor year cannot form a calendar date; a wrong countdown would be
/// worse than failing fast.
pub fn next_new_year(now: &NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
        .expect("january 1 of the successor year is a calendar date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time of day")
}

/// Decomposes the time left until `target` into days/hours/minutes/seconds,
/// plus a completion flag.
///
/// The delta is truncated to whole seconds before anything else, and a delta
/// of zero or less counts as completed: standing exactly on the target is
/// already the celebration, not one last zero-second wait. Calendar lengths
/// (leap years included) come out of chrono's date arithmetic, never from
/// hand-rolled day counting.
pub fn compute_remaining_until(now: NaiveDateTime, target: NaiveDateTime) -> (Remaining, bool) {
    let delta = (target - now).num_seconds();
    if delta <= 0 {
        return (Remaining::ZERO, true);
    }
    let remaining = Remaining {
        days: delta / 86_400,
        hours: (delta / 3_600 % 24) as u32,
        minutes: (delta / 60 % 60) as u32,
        seconds: (delta % 60) as u32,
    };
    (remaining, false)
}

/// Convenience form: counts toward the new year following `now` itself.
pub fn compute_remaining(now: NaiveDateTime) -> (Remaining, bool) {
    compute_remaining_until(now, next_new_year(&now))
}

/// Edge-triggered completion latch: runs the wrapped callback on the first
/// completed tick and never again for the lifetime of the session.
pub(crate) struct CompletionLatch {
    callback: Option<Box<dyn FnOnce()>>,
    fired: bool,
}

impl CompletionLatch {
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
            fired: false,
        }
    }

    pub fn fire_if(&mut self, completed: bool) {
        if completed && !self.fired {
            self.fired = true;
            if let Some(cb) = self.callback.take() {
                cb();
            }
        }
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

/// Wall-clock refresh loop: recomputes the remaining duration from a fresh
/// clock reading once per second and pushes it to the display callback. The
/// loop keeps ticking after completion, pinning the display at zeros; only
/// the completion callback is one-shot.
pub(crate) struct CountdownLoop {
    interval: Interval,
}

impl CountdownLoop {
    pub fn start(
        mut on_tick: impl FnMut(Remaining, bool) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<Self, JsValue> {
        let target = next_new_year(&Local::now().naive_local());
        let mut latch = CompletionLatch::new(on_complete);
        let mut tick = move || {
            let (remaining, reached) = compute_remaining_until(Local::now().naive_local(), target);
            latch.fire_if(reached);
            // Once celebrated, stay celebrated even across a backward clock jump.
            if latch.fired() {
                on_tick(Remaining::ZERO, true);
            } else {
                on_tick(remaining, false);
            }
        };
        // Immediate first paint so the display never starts blank.
        tick();
        let interval = Interval::new(1_000, tick)?;
        Ok(Self { interval })
    }

    /// Idempotent stop; the interval handle tolerates repeated cancellation.
    pub fn stop(&mut self) {
        self.interval.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn one_second_before_midnight() {
        let (rem, done) = compute_remaining(at(2025, 12, 31, 23, 59, 59));
        assert!(!done);
        assert_eq!(
            rem,
            Remaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 1
            }
        );
    }

    #[test]
    fn exactly_at_target_is_completed() {
        let target = at(2026, 1, 1, 0, 0, 0);
        let (rem, done) = compute_remaining_until(target, target);
        assert!(done);
        assert_eq!(rem, Remaining::ZERO);
    }

    #[test]
    fn past_target_stays_completed_and_zero() {
        let target = at(2026, 1, 1, 0, 0, 0);
        let (rem, done) = compute_remaining_until(at(2026, 1, 1, 0, 0, 1), target);
        assert!(done);
        assert_eq!(rem, Remaining::ZERO);
    }

    #[test]
    fn decomposition_identity() {
        let now = at(2025, 6, 15, 12, 0, 0);
        let (rem, done) = compute_remaining(now);
        assert!(!done);
        let delta = (next_new_year(&now) - now).num_seconds();
        assert_eq!(rem.total_seconds(), delta);
        assert!(rem.hours <= 23 && rem.minutes <= 59 && rem.seconds <= 59);
    }

    #[test]
    fn calendar_day_count_matches_chrono() {
        // 2025-06-15T12:00 → 2026-01-01: whole days minus the half day spent.
        let now = at(2025, 6, 15, 12, 0, 0);
        let (rem, _) = compute_remaining(now);
        let whole_days = (NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
            - NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
        .num_days();
        assert_eq!(rem.days, whole_days - 1);
        assert_eq!(rem.hours, 12);
        assert_eq!(rem.minutes, 0);
        assert_eq!(rem.seconds, 0);
    }

    #[test]
    fn leap_day_is_counted() {
        // 2024 is a leap year; a countdown started mid-January crosses Feb 29.
        let now = at(2024, 1, 15, 0, 0, 0);
        let (rem, _) = compute_remaining(now);
        let expected = (NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
            - NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        .num_days();
        assert_eq!(rem.days, expected);
        assert_eq!(expected, 352); // 17 left in January + 335 across leap Feb..Dec
    }

    #[test]
    fn pure_and_idempotent() {
        let now = at(2025, 11, 3, 7, 21, 42);
        assert_eq!(compute_remaining(now), compute_remaining(now));
    }

    #[test]
    fn latch_fires_exactly_once() {
        let fired = Rc::new(Cell::new(0u32));
        let counter = fired.clone();
        let mut latch = CompletionLatch::new(move || counter.set(counter.get() + 1));
        latch.fire_if(false);
        assert!(!latch.fired());
        assert_eq!(fired.get(), 0);
        latch.fire_if(true);
        latch.fire_if(true);
        latch.fire_if(true);
        assert!(latch.fired());
        assert_eq!(fired.get(), 1);
    }
}
