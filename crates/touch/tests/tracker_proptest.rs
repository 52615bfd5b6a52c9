//! Property-based tests for the slot tracker.
//! Random frame sequences on an 800 × 480, five-finger panel.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use platform::{FrameStatus, TouchEventKind, MAX_TOUCH_POINTS};
use proptest::prelude::*;
use touch::{RawSample, Snapshot, TouchTracker};

const K: u8 = 5;
const RANGE_X: u16 = 800;
const RANGE_Y: u16 = 480;

/// Coordinates straddle the panel edge so some samples are out of range.
fn sample() -> impl Strategy<Value = RawSample> {
    (any::<bool>(), 0u16..1_000, 0u16..600, any::<u8>()).prop_map(|(valid, x, y, pressure)| {
        RawSample {
            valid,
            x,
            y,
            pressure,
        }
    })
}

fn frames() -> impl Strategy<Value = Vec<Snapshot>> {
    let frame = prop::collection::vec(sample(), 0..=usize::from(K))
        .prop_map(|samples| Snapshot::from_samples(&samples).unwrap());
    prop::collection::vec(frame, 1..24)
}

/// Frames of any size the controller could claim, including above K.
fn wide_frames() -> impl Strategy<Value = Vec<Snapshot>> {
    let frame = prop::collection::vec(sample(), 0..=MAX_TOUCH_POINTS)
        .prop_map(|samples| Snapshot::from_samples(&samples).unwrap());
    prop::collection::vec(frame, 1..24)
}

fn in_range(s: &RawSample) -> bool {
    s.x < RANGE_X && s.y < RANGE_Y
}

proptest! {
    /// At most one event per slot per poll.
    #[test]
    fn one_event_per_slot(seq in frames()) {
        let mut tracker = TouchTracker::new(K, RANGE_X, RANGE_Y);
        for (t, frame) in seq.iter().enumerate() {
            let report = tracker.apply(frame, t as u64);
            let mut seen = [false; 10];
            for ev in &report.events {
                let slot = usize::from(ev.slot);
                prop_assert!(!seen[slot], "slot {} reported twice", slot);
                seen[slot] = true;
            }
        }
    }

    /// MOVE only follows an earlier DOWN on the same slot.
    #[test]
    fn move_requires_down(seq in frames()) {
        let mut tracker = TouchTracker::new(K, RANGE_X, RANGE_Y);
        for (t, frame) in seq.iter().enumerate() {
            let before: Vec<bool> = (0..K)
                .map(|i| tracker.slot(i).unwrap().is_down)
                .collect();
            let report = tracker.apply(frame, t as u64);
            for ev in report.events.iter().filter(|e| e.kind == TouchEventKind::Move) {
                prop_assert!(before[usize::from(ev.slot)]);
            }
        }
    }

    /// After UP the slot is released and has no stored position.
    #[test]
    fn up_clears_slot(seq in frames()) {
        let mut tracker = TouchTracker::new(K, RANGE_X, RANGE_Y);
        for (t, frame) in seq.iter().enumerate() {
            let report = tracker.apply(frame, t as u64);
            for ev in report.events.iter().filter(|e| e.kind == TouchEventKind::Up) {
                let slot = tracker.slot(ev.slot).unwrap();
                prop_assert!(!slot.is_down);
                prop_assert_eq!(slot.last, None);
            }
        }
    }

    /// Out-of-range samples leave their slot untouched and emit nothing.
    #[test]
    fn out_of_range_is_inert(seq in frames()) {
        let mut tracker = TouchTracker::new(K, RANGE_X, RANGE_Y);
        for (t, frame) in seq.iter().enumerate() {
            let before: Vec<_> = (0..K).map(|i| *tracker.slot(i).unwrap()).collect();
            let report = tracker.apply(frame, t as u64);
            for (i, s) in frame.samples().enumerate() {
                if !s.valid || in_range(s) {
                    continue;
                }
                let after = tracker.slot(u8::try_from(i).unwrap()).unwrap();
                prop_assert_eq!(after.is_down, before[i].is_down);
                prop_assert_eq!(after.last, before[i].last);
                prop_assert!(report.events.iter().all(|e| usize::from(e.slot) != i));
            }
        }
    }

    /// Every DOWN is eventually matched by an UP once all fingers lift.
    #[test]
    fn empty_frame_releases_everything(seq in frames()) {
        let mut tracker = TouchTracker::new(K, RANGE_X, RANGE_Y);
        let mut down = 0i32;
        for (t, frame) in seq.iter().enumerate() {
            let report = tracker.apply(frame, t as u64);
            down += report.count(TouchEventKind::Down) as i32;
            down -= report.count(TouchEventKind::Up) as i32;
        }
        let report = tracker.apply(&Snapshot::empty(), seq.len() as u64);
        down -= report.count(TouchEventKind::Up) as i32;
        prop_assert_eq!(down, 0);
        for i in 0..K {
            prop_assert!(!tracker.slot(i).unwrap().is_down);
        }
    }

    /// Frames above K yield no contacts and leave no finger down.
    #[test]
    fn count_above_k_releases_everything(seq in wide_frames()) {
        let mut tracker = TouchTracker::new(K, RANGE_X, RANGE_Y);
        for (t, frame) in seq.iter().enumerate() {
            let report = tracker.apply(frame, t as u64);
            if frame.finger_count() <= K {
                prop_assert_eq!(report.status, FrameStatus::Accepted);
                continue;
            }
            prop_assert_eq!(
                report.status,
                FrameStatus::Discarded { reported: frame.finger_count(), max: K }
            );
            prop_assert_eq!(report.count(TouchEventKind::Down), 0);
            prop_assert_eq!(report.count(TouchEventKind::Move), 0);
            for i in 0..K {
                prop_assert!(!tracker.slot(i).unwrap().is_down);
            }
        }
    }
}
