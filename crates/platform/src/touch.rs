//! Touch panel abstraction
//!
//! Drivers report one [`TouchEvent`] per positional finger slot per poll.
//! Slot numbers are array positions reported by the controller, not stable
//! per-finger identities: a finger that lifts while another lands in the
//! same poll may be reported under the slot of the one that lifted.

/// Capacity of every per-poll event buffer.
///
/// A panel's `max_touches` is chosen at init and must not exceed this.
pub const MAX_TOUCH_POINTS: usize = 10;

/// Events produced by one poll, in emission order.
pub type TouchEvents = heapless::Vec<TouchEvent, MAX_TOUCH_POINTS>;

/// Touch panel driver trait
pub trait TouchDevice {
    /// Error type for poll failures
    type Error: core::fmt::Debug;

    /// Read the controller and classify every slot that changed.
    ///
    /// A poll that fails leaves no events behind; the next successful poll
    /// resumes from the last good slot state.
    fn poll(&mut self) -> impl core::future::Future<Output = Result<TouchReport, Self::Error>>;

    /// Static panel capabilities
    fn info(&self) -> TouchInfo;
}

/// Event classification for one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEventKind {
    /// Slot was touched by the controller but carried no contact
    #[default]
    None,
    /// First contact in this slot
    Down,
    /// Contact continued in this slot
    Move,
    /// Contact left this slot
    Up,
}

/// One classified touch record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    /// Positional slot index (0..max_touches)
    pub slot: u8,
    /// What happened in this slot
    pub kind: TouchEventKind,
    /// X in panel coordinates. For `Up` this is the last reported position.
    pub x: u16,
    /// Y in panel coordinates. For `Up` this is the last reported position.
    pub y: u16,
    /// Contact width / pressure as reported by the controller
    pub width: u8,
    /// Monotonic timestamp in milliseconds
    pub timestamp: u64,
    /// Tracking id (equal to `slot` for positional controllers)
    pub track_id: u8,
}

impl TouchEvent {
    /// `true` for `Down` and `Move`
    pub fn is_contact(&self) -> bool {
        matches!(self.kind, TouchEventKind::Down | TouchEventKind::Move)
    }
}

/// Sensing technology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchType {
    /// Capacitive panel
    Capacitive,
}

/// Static panel capabilities, fixed at init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchInfo {
    /// Sensing technology
    pub kind: TouchType,
    /// Exclusive upper bound for X
    pub range_x: u16,
    /// Exclusive upper bound for Y
    pub range_y: u16,
    /// Maximum simultaneous touches (K)
    pub max_touches: u8,
}

impl TouchInfo {
    /// `true` if `(x, y)` lies inside the panel
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x < self.range_x && y < self.range_y
    }
}

/// Whether the controller's frame was used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameStatus {
    /// Frame decoded and applied
    #[default]
    Accepted,
    /// Controller reported more fingers than the panel supports; the frame
    /// was processed as if no finger were present.
    Discarded {
        /// Finger count the controller reported
        reported: u8,
        /// Panel capability it exceeded
        max: u8,
    },
}

/// Result of one successful poll
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchReport {
    /// Classified events (lift-offs first, then contacts, by slot)
    pub events: TouchEvents,
    /// Frame disposition
    pub status: FrameStatus,
}

impl TouchReport {
    /// `true` when the poll produced no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events whose kind is `kind`
    pub fn count(&self, kind: TouchEventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}
