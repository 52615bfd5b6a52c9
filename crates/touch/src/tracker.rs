//! Positional multi-touch slot tracker.
//!
//! Turns decoded controller frames into DOWN / MOVE / UP / NONE events, one
//! per slot at most. The tracker does no I/O; the driver feeds it frames and
//! timestamps.
//!
//! Slot identity is the sample's position in the frame. The controller
//! reuses positions rather than assigning stable ids, so if fingers lift and
//! land within one poll the new finger inherits the old slot's history.

use platform::{FrameStatus, TouchEvent, TouchEventKind, TouchEvents, TouchReport, MAX_TOUCH_POINTS};

use crate::st1663i::snapshot::{RawSample, Snapshot};

/// Last reported position of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// X in panel coordinates
    pub x: u16,
    /// Y in panel coordinates
    pub y: u16,
    /// Contact width / pressure
    pub width: u8,
}

/// Per-slot history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerSlot {
    /// Last emitted position; `None` once the slot has lifted
    pub last: Option<Contact>,
    /// A DOWN has been emitted without a matching UP
    pub is_down: bool,
    /// Positional id that occupied this slot last frame
    pub previous_id: Option<u8>,
}

/// Slot state for one panel
#[derive(Debug, Clone)]
pub struct TouchTracker {
    slots: [FingerSlot; MAX_TOUCH_POINTS],
    max_touches: u8,
    range_x: u16,
    range_y: u16,
    previous_count: u8,
}

impl TouchTracker {
    /// Create a tracker with every slot unset.
    ///
    /// `max_touches` is clamped to [`MAX_TOUCH_POINTS`]; callers validate
    /// the panel configuration before getting here.
    pub fn new(max_touches: u8, range_x: u16, range_y: u16) -> Self {
        let cap = u8::try_from(MAX_TOUCH_POINTS).unwrap_or(u8::MAX);
        Self {
            slots: [FingerSlot::default(); MAX_TOUCH_POINTS],
            max_touches: max_touches.min(cap),
            range_x,
            range_y,
            previous_count: 0,
        }
    }

    /// Back to the freshly initialised state.
    pub fn reset(&mut self) {
        self.slots = [FingerSlot::default(); MAX_TOUCH_POINTS];
        self.previous_count = 0;
    }

    /// K
    pub fn max_touches(&self) -> u8 {
        self.max_touches
    }

    /// Finger count recorded by the last applied frame
    pub fn previous_count(&self) -> u8 {
        self.previous_count
    }

    /// State of slot `i`, if `i < K`
    pub fn slot(&self, i: u8) -> Option<&FingerSlot> {
        self.active_slots().get(usize::from(i))
    }

    fn active_slots(&self) -> &[FingerSlot] {
        self.slots
            .get(..usize::from(self.max_touches))
            .unwrap_or(&self.slots)
    }

    /// Record a failed transfer.
    ///
    /// Slot state is left alone so a single bus error does not release every
    /// finger; only the count used for the next lift-off comparison drops to
    /// zero.
    pub fn transport_failed(&mut self) {
        self.previous_count = 0;
    }

    /// Process a frame whose finger count exceeded K as an empty frame.
    ///
    /// Every slot that held a finger is released, even when a failed
    /// transfer has already dropped the remembered count.
    pub fn discard(&mut self, reported: u8, now_ms: u64) -> TouchReport {
        let mut events = TouchEvents::new();
        self.release_from(0, &mut events, now_ms);
        self.previous_count = 0;
        TouchReport {
            events,
            status: FrameStatus::Discarded {
                reported,
                max: self.max_touches,
            },
        }
    }

    /// Classify one decoded frame.
    ///
    /// Lift-offs are emitted first, then contacts, each in slot order.
    /// A frame reporting more than K fingers is handed to [`Self::discard`].
    pub fn apply(&mut self, frame: &Snapshot, now_ms: u64) -> TouchReport {
        let count = frame.finger_count();
        if count > self.max_touches {
            return self.discard(count, now_ms);
        }

        let mut events = TouchEvents::new();
        if self.previous_count > count {
            self.release_from(count, &mut events, now_ms);
        }

        for (i, sample) in (0..count).zip(frame.samples()) {
            let Some(slot) = self.slots.get_mut(usize::from(i)) else {
                break;
            };
            slot.previous_id = Some(i);

            if !sample.valid {
                push(&mut events, lift(slot, i, now_ms));
                continue;
            }

            if sample.x >= self.range_x || sample.y >= self.range_y {
                error!(
                    "invalid position in slot {}: x {} (max {}), y {} (max {})",
                    i,
                    sample.x,
                    self.range_x,
                    sample.y,
                    self.range_y
                );
                continue;
            }

            push(&mut events, contact(slot, i, sample, now_ms));
        }

        self.previous_count = count;

        TouchReport {
            events,
            status: FrameStatus::Accepted,
        }
    }
    /// Lift every slot that held a finger last frame at a position `>= count`.
    fn release_from(&mut self, count: u8, events: &mut TouchEvents, now_ms: u64) {
        for i in 0..self.max_touches {
            let Some(slot) = self.slots.get_mut(usize::from(i)) else {
                break;
            };
            let still_present = slot.previous_id.is_some_and(|id| id < count);
            if slot.previous_id.is_some() && !still_present {
                trace!("slot {} lifted", i);
                push(events, lift(slot, i, now_ms));
                slot.previous_id = None;
            }
        }
    }
}

fn push(events: &mut TouchEvents, event: TouchEvent) {
    // One event per slot and at most MAX_TOUCH_POINTS slots: never full.
    if events.push(event).is_err() {
        warn!("event buffer full, dropped slot {}", event.slot);
    }
}

/// UP if the slot was down, NONE otherwise; clears the slot's position.
fn lift(slot: &mut FingerSlot, id: u8, now_ms: u64) -> TouchEvent {
    let kind = if slot.is_down {
        slot.is_down = false;
        TouchEventKind::Up
    } else {
        TouchEventKind::None
    };
    let last = slot.last.take();
    TouchEvent {
        slot: id,
        kind,
        x: last.map_or(0, |c| c.x),
        y: last.map_or(0, |c| c.y),
        width: last.map_or(0, |c| c.width),
        timestamp: now_ms,
        track_id: id,
    }
}

/// DOWN on first contact, MOVE afterwards; stores the new position.
fn contact(slot: &mut FingerSlot, id: u8, sample: &RawSample, now_ms: u64) -> TouchEvent {
    let kind = if slot.is_down {
        TouchEventKind::Move
    } else {
        slot.is_down = true;
        TouchEventKind::Down
    };
    slot.last = Some(Contact {
        x: sample.x,
        y: sample.y,
        width: sample.pressure,
    });
    TouchEvent {
        slot: id,
        kind,
        x: sample.x,
        y: sample.y,
        width: sample.pressure,
        timestamp: now_ms,
        track_id: id,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    fn tracker() -> TouchTracker {
        TouchTracker::new(5, 800, 480)
    }

    fn touch(x: u16, y: u16) -> RawSample {
        RawSample {
            valid: true,
            x,
            y,
            pressure: 10,
        }
    }

    fn frame(samples: &[RawSample]) -> Snapshot {
        Snapshot::from_samples(samples).unwrap()
    }

    fn kinds(report: &TouchReport) -> Vec<(u8, TouchEventKind)> {
        report.events.iter().map(|e| (e.slot, e.kind)).collect()
    }

    #[test]
    fn first_contact_is_down() {
        let mut t = tracker();
        let r = t.apply(&frame(&[touch(100, 200)]), 1);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Down)]);
        let ev = r.events[0];
        assert_eq!((ev.x, ev.y, ev.width, ev.timestamp, ev.track_id), (100, 200, 10, 1, 0));
        assert!(t.slot(0).unwrap().is_down);
    }

    #[test]
    fn continued_contact_is_move() {
        let mut t = tracker();
        t.apply(&frame(&[touch(100, 200)]), 1);
        let r = t.apply(&frame(&[touch(110, 205)]), 2);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Move)]);
        assert_eq!((r.events[0].x, r.events[0].y), (110, 205));
    }

    #[test]
    fn lift_reports_last_position_and_clears_slot() {
        let mut t = tracker();
        t.apply(&frame(&[touch(100, 200)]), 1);
        t.apply(&frame(&[touch(110, 205)]), 2);
        let r = t.apply(&Snapshot::empty(), 3);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Up)]);
        assert_eq!((r.events[0].x, r.events[0].y, r.events[0].timestamp), (110, 205, 3));
        let slot = t.slot(0).unwrap();
        assert!(!slot.is_down);
        assert_eq!(slot.last, None);
        assert_eq!(slot.previous_id, None);
    }

    #[test]
    fn out_of_range_sample_is_skipped_without_state_change() {
        let mut t = tracker();
        let before = *t.slot(0).unwrap();
        let r = t.apply(&frame(&[touch(900, 200)]), 1);
        assert!(r.is_empty());
        let after = t.slot(0).unwrap();
        assert_eq!(after.is_down, before.is_down);
        assert_eq!(after.last, before.last);
    }

    #[test]
    fn out_of_range_does_not_disturb_a_down_slot() {
        let mut t = tracker();
        t.apply(&frame(&[touch(100, 200)]), 1);
        let r = t.apply(&frame(&[touch(100, 480)]), 2);
        assert!(r.is_empty());
        let slot = t.slot(0).unwrap();
        assert!(slot.is_down);
        assert_eq!(slot.last, Some(Contact { x: 100, y: 200, width: 10 }));
    }

    #[test]
    fn invalid_sample_lifts_down_slot() {
        let mut t = tracker();
        t.apply(&frame(&[touch(100, 200)]), 1);
        let gone = RawSample { valid: false, ..touch(0, 0) };
        let r = t.apply(&frame(&[gone]), 2);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Up)]);
        assert_eq!((r.events[0].x, r.events[0].y), (100, 200));
        assert!(!t.slot(0).unwrap().is_down);
    }

    #[test]
    fn invalid_sample_on_idle_slot_is_none() {
        let mut t = tracker();
        let gone = RawSample { valid: false, ..touch(0, 0) };
        let r = t.apply(&frame(&[gone]), 1);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::None)]);
    }

    #[test]
    fn shrinking_count_lifts_trailing_slots_first() {
        let mut t = tracker();
        t.apply(&frame(&[touch(10, 10), touch(20, 20), touch(30, 30)]), 1);
        let r = t.apply(&frame(&[touch(11, 11)]), 2);
        assert_eq!(
            kinds(&r),
            vec![
                (1, TouchEventKind::Up),
                (2, TouchEventKind::Up),
                (0, TouchEventKind::Move),
            ]
        );
        assert_eq!(t.previous_count(), 1);
    }

    #[test]
    fn growing_count_adds_downs() {
        let mut t = tracker();
        t.apply(&frame(&[touch(10, 10)]), 1);
        let r = t.apply(&frame(&[touch(10, 10), touch(50, 60)]), 2);
        assert_eq!(
            kinds(&r),
            vec![(0, TouchEventKind::Move), (1, TouchEventKind::Down)]
        );
    }

    #[test]
    fn transport_failure_keeps_slots_latched() {
        let mut t = tracker();
        t.apply(&frame(&[touch(10, 10), touch(20, 20)]), 1);
        t.transport_failed();
        assert_eq!(t.previous_count(), 0);
        assert!(t.slot(1).unwrap().is_down);

        // No lift-off scan on the first frame after a failure.
        let r = t.apply(&frame(&[touch(12, 12)]), 2);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Move)]);
        assert!(t.slot(1).unwrap().is_down);

        // A later shrinking frame releases the stale slot.
        let r = t.apply(&Snapshot::empty(), 3);
        assert_eq!(
            kinds(&r),
            vec![(0, TouchEventKind::Up), (1, TouchEventKind::Up)]
        );
    }

    #[test]
    fn discarded_frame_releases_down_slots() {
        let mut t = tracker();
        t.apply(&frame(&[touch(10, 10)]), 1);
        let r = t.discard(7, 2);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Up)]);
        assert_eq!(r.status, FrameStatus::Discarded { reported: 7, max: 5 });
    }

    #[test]
    fn discard_after_transport_failure_still_releases() {
        let mut t = tracker();
        t.apply(&frame(&[touch(10, 10), touch(20, 20)]), 1);
        t.transport_failed();
        let r = t.discard(9, 2);
        assert_eq!(
            kinds(&r),
            vec![(0, TouchEventKind::Up), (1, TouchEventKind::Up)]
        );
        assert!(!t.slot(0).unwrap().is_down);
        assert!(!t.slot(1).unwrap().is_down);
        assert_eq!(t.previous_count(), 0);
    }

    #[test]
    fn frame_above_k_is_discarded_not_truncated() {
        let mut t = tracker();
        t.apply(&frame(&[touch(10, 10)]), 1);
        let seven: Vec<RawSample> = (0..7u16).map(|i| touch(10 * i, 10)).collect();
        let r = t.apply(&frame(&seven), 2);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Up)]);
        assert_eq!(r.status, FrameStatus::Discarded { reported: 7, max: 5 });
        for i in 0..5 {
            assert!(!t.slot(i).unwrap().is_down);
        }
        assert_eq!(t.previous_count(), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = tracker();
        t.apply(&frame(&[touch(10, 10), touch(20, 20)]), 1);
        t.reset();
        assert_eq!(t.previous_count(), 0);
        assert_eq!(*t.slot(0).unwrap(), FingerSlot::default());
        let r = t.apply(&frame(&[touch(10, 10)]), 2);
        assert_eq!(kinds(&r), vec![(0, TouchEventKind::Down)]);
    }

    #[test]
    fn slot_lookup_is_bounded_by_k() {
        let t = TouchTracker::new(2, 800, 480);
        assert!(t.slot(1).is_some());
        assert!(t.slot(2).is_none());
    }

    #[test]
    fn k_is_clamped_to_capacity() {
        let t = TouchTracker::new(200, 800, 480);
        assert_eq!(usize::from(t.max_touches()), MAX_TOUCH_POINTS);
    }
}
