//! In-process doubles for host-side testing
//!
//! [`MockTouchBus`] stands in for the I²C bus with an ST1663i on it: it
//! serves queued touch data blocks, fails on demand, and records register
//! writes. [`MockResetPin`] and [`MockDelay`] cover the reset sequence.
//! Everything is `no_std` so downstream crates can use it in their own
//! tests.

use embedded_hal::i2c::ErrorKind;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation};
use heapless::{Deque, Vec};

use crate::st1663i::registers::{MAX_FRAME_LEN, REG_TOUCH_DATA};
use crate::st1663i::snapshot::Snapshot;

/// Queued reply for the next touch data read
#[derive(Debug, Clone)]
enum Reply {
    Frame(Vec<u8, MAX_FRAME_LEN>),
    Fail(ErrorKind),
}

/// Scripted ST1663i on a mock bus
#[derive(Debug, Default)]
pub struct MockTouchBus {
    replies: Deque<Reply, 16>,
    writes: Vec<(u8, u8, u8), 16>,
    fail_writes: Option<ErrorKind>,
    reads: usize,
    last_address: Option<u8>,
}

impl MockTouchBus {
    /// Bus with nothing queued; reads return an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a decoded frame. Returns `false` if the queue is full.
    pub fn push_frame(&mut self, frame: &Snapshot) -> bool {
        let mut raw = [0u8; MAX_FRAME_LEN];
        let len = frame.encode(&mut raw);
        self.push_raw(raw.get(..len).unwrap_or(&[]))
    }

    /// Queue raw touch data bytes (e.g. a malformed finger count).
    pub fn push_raw(&mut self, raw: &[u8]) -> bool {
        let mut bytes = Vec::new();
        for b in raw.iter().take(MAX_FRAME_LEN) {
            // Capacity checked by take().
            let _ = bytes.push(*b);
        }
        self.replies.push_back(Reply::Frame(bytes)).is_ok()
    }

    /// Make the next touch data read fail.
    pub fn push_failure(&mut self, kind: ErrorKind) -> bool {
        self.replies.push_back(Reply::Fail(kind)).is_ok()
    }

    /// Fail every register write with `kind` (or stop failing with `None`).
    pub fn fail_writes(&mut self, kind: Option<ErrorKind>) {
        self.fail_writes = kind;
    }

    /// Register writes seen so far as `(address, register, value)`
    pub fn writes(&self) -> &[(u8, u8, u8)] {
        &self.writes
    }

    /// Touch data reads served (including failed ones)
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Device address of the last transaction
    pub fn last_address(&self) -> Option<u8> {
        self.last_address
    }

    fn serve_read(&mut self, buf: &mut [u8]) -> Result<(), ErrorKind> {
        self.reads = self.reads.saturating_add(1);
        buf.fill(0);
        match self.replies.pop_front() {
            Some(Reply::Fail(kind)) => Err(kind),
            Some(Reply::Frame(bytes)) => {
                for (dst, src) in buf.iter_mut().zip(bytes.iter()) {
                    *dst = *src;
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl ErrorType for MockTouchBus {
    type Error = ErrorKind;
}

impl I2c for MockTouchBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.last_address = Some(address);
        let mut pointer = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => match **data {
                    [reg] => pointer = Some(reg),
                    [reg, value] => {
                        if let Some(kind) = self.fail_writes {
                            return Err(kind);
                        }
                        let _ = self.writes.push((address, reg, value));
                    }
                    _ => return Err(ErrorKind::Other),
                },
                Operation::Read(buf) => {
                    if pointer != Some(REG_TOUCH_DATA) {
                        return Err(ErrorKind::Other);
                    }
                    self.serve_read(buf)?;
                }
            }
        }
        Ok(())
    }
}

/// Reset line that records every level it is driven to
#[derive(Debug, Default)]
pub struct MockResetPin {
    levels: Vec<bool, 8>,
    broken: bool,
}

impl MockResetPin {
    /// Working pin
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin whose every operation fails
    pub fn broken() -> Self {
        Self {
            levels: Vec::new(),
            broken: true,
        }
    }

    /// Levels driven so far (`false` = low)
    pub fn levels(&self) -> &[bool] {
        &self.levels
    }

    fn drive(&mut self, high: bool) -> Result<(), PinFault> {
        if self.broken {
            return Err(PinFault);
        }
        let _ = self.levels.push(high);
        Ok(())
    }
}

/// Error raised by [`MockResetPin::broken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::digital::ErrorType for MockResetPin {
    type Error = PinFault;
}

impl embedded_hal::digital::OutputPin for MockResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// Delay that returns immediately and records each requested wait
#[derive(Debug, Default)]
pub struct MockDelay {
    waits_ns: Vec<u64, 16>,
}

impl MockDelay {
    /// Fresh delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested waits in nanoseconds, in order
    pub fn waits_ns(&self) -> &[u64] {
        &self.waits_ns
    }

    /// Requested waits rounded down to milliseconds
    pub fn waits_ms(&self) -> impl Iterator<Item = u64> + '_ {
        self.waits_ns.iter().map(|ns| ns / 1_000_000)
    }

    fn record(&mut self, ns: u64) {
        let _ = self.waits_ns.push(ns);
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us).saturating_mul(1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms).saturating_mul(1_000_000));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::st1663i::snapshot::RawSample;

    #[tokio::test]
    async fn empty_bus_serves_zero_frame() {
        let mut bus = MockTouchBus::new();
        let mut buf = [0xAAu8; 7];
        bus.write_read(0x55, &[REG_TOUCH_DATA], &mut buf).await.unwrap();
        assert_eq!(buf, [0; 7]);
        assert_eq!(bus.reads(), 1);
        assert_eq!(bus.last_address(), Some(0x55));
    }

    #[tokio::test]
    async fn queued_frame_then_failure() {
        let mut bus = MockTouchBus::new();
        let frame = Snapshot::from_samples(&[RawSample {
            valid: true,
            x: 1,
            y: 2,
            pressure: 3,
        }])
        .unwrap();
        assert!(bus.push_frame(&frame));
        assert!(bus.push_failure(ErrorKind::Bus));

        let mut buf = [0u8; 7];
        bus.write_read(0x55, &[REG_TOUCH_DATA], &mut buf).await.unwrap();
        assert_eq!(buf, [1, 1, 0, 1, 0, 2, 3]);
        assert_eq!(
            bus.write_read(0x55, &[REG_TOUCH_DATA], &mut buf).await,
            Err(ErrorKind::Bus)
        );
    }

    #[tokio::test]
    async fn register_writes_are_logged() {
        let mut bus = MockTouchBus::new();
        bus.write(0x55, &[0x00, 0x00]).await.unwrap();
        assert_eq!(bus.writes(), &[(0x55, 0x00, 0x00)]);
        bus.fail_writes(Some(ErrorKind::Other));
        assert!(bus.write(0x55, &[0x00, 0x01]).await.is_err());
        assert_eq!(bus.writes().len(), 1);
    }

    #[tokio::test]
    async fn read_from_unknown_register_fails() {
        let mut bus = MockTouchBus::new();
        let mut buf = [0u8; 1];
        assert!(bus.write_read(0x55, &[0x20], &mut buf).await.is_err());
    }

    #[tokio::test]
    async fn delay_records_ms() {
        use embedded_hal_async::delay::DelayNs as _;
        let mut d = MockDelay::new();
        d.delay_ms(5).await;
        d.delay_ms(200).await;
        assert_eq!(d.waits_ms().collect::<std::vec::Vec<_>>(), vec![5, 200]);
    }
}
