//! ST1663i capacitive touch controller driver
//!
//! Communicates with the chip via I²C. Uses the `embedded_hal_async::i2c::I2c`
//! trait so it is HAL-agnostic while remaining async.
//!
//! The interrupt line is not handled here; see [`crate::service`] for the
//! interrupt-driven polling loop.
//!
//! # Bring-up
//!
//! 1. Board code configures the bus ([`PanelConfig::bus`], 400 kHz).
//! 2. [`St1663i::new`] validates the panel configuration.
//! 3. [`St1663i::init`] pulses the reset line and puts the controller in
//!    normal mode.
//! 4. [`TouchDevice::poll`] on every interrupt (or timer tick).

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use platform::{Clock, PanelConfig, TouchDevice, TouchInfo, TouchReport};

use super::registers::{
    frame_len, DEVICE_CONTROL_NORMAL, MAX_FRAME_LEN, REG_DEVICE_CONTROL, REG_TOUCH_DATA,
};
use super::snapshot::{FingerOverflow, Snapshot};
use crate::error::TouchError;
use crate::tracker::TouchTracker;

/// ST1663i touch driver
pub struct St1663i<I, C> {
    i2c: I,
    clock: C,
    config: PanelConfig,
    tracker: TouchTracker,
}

impl<I: I2c, C: Clock> St1663i<I, C> {
    /// Create a new ST1663i driver.
    ///
    /// `i2c` must be a configured async I²C peripheral pointing at the chip;
    /// `clock` stamps every event.
    pub fn new(i2c: I, clock: C, config: PanelConfig) -> Result<Self, TouchError> {
        config.validate()?;
        Ok(Self {
            i2c,
            clock,
            tracker: TouchTracker::new(config.max_touches, config.range_x, config.range_y),
            config,
        })
    }

    /// Release the bus and clock.
    pub fn release(self) -> (I, C) {
        (self.i2c, self.clock)
    }

    /// Panel configuration in use
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Slot state, for diagnostics
    pub fn tracker(&self) -> &TouchTracker {
        &self.tracker
    }

    /// Write a single register over I²C.
    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), TouchError> {
        self.i2c
            .write(self.config.address, &[reg, value])
            .await
            .map_err(|e| TouchError::transport(&e))
    }

    /// Hardware reset and mode setup.
    ///
    /// Holds `reset` low for `reset_low_ms`, releases it, waits
    /// `reset_settle_ms` for the controller to boot, then selects normal
    /// mode. Slot state is cleared.
    pub async fn init<R, D>(&mut self, reset: &mut R, delay: &mut D) -> Result<(), TouchError>
    where
        R: OutputPin,
        D: DelayNs,
    {
        reset.set_low().map_err(|_| TouchError::Gpio)?;
        delay.delay_ms(self.config.reset_low_ms).await;
        reset.set_high().map_err(|_| TouchError::Gpio)?;
        delay.delay_ms(self.config.reset_settle_ms).await;

        self.write_reg(REG_DEVICE_CONTROL, DEVICE_CONTROL_NORMAL).await?;
        self.tracker.reset();

        info!(
            "ST1663i ready at address {} ({} Hz): {}x{}, {} touches",
            self.config.address,
            self.config.bus.frequency,
            self.config.range_x,
            self.config.range_y,
            self.config.max_touches
        );
        Ok(())
    }

    /// Read the touch data block and classify it.
    async fn read_point(&mut self) -> Result<TouchReport, TouchError> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let len = frame_len(self.config.max_touches);
        let frame = buf.get_mut(..len).unwrap_or(&mut []);

        if let Err(e) = self
            .i2c
            .write_read(self.config.address, &[REG_TOUCH_DATA], frame)
            .await
        {
            let err = TouchError::transport(&e);
            error!("get touch data failed");
            self.tracker.transport_failed();
            return Err(err);
        }

        let now = self.clock.now_ms();
        let report = match Snapshot::parse(frame, self.config.max_touches) {
            Ok(snapshot) => self.tracker.apply(&snapshot, now),
            Err(FingerOverflow { reported, max }) => {
                error!(
                    "controller reported {} fingers > panel max {}",
                    reported, max
                );
                self.tracker.discard(reported, now)
            }
        };

        for ev in &report.events {
            trace!(
                "slot {} {} ({}, {}) w={}",
                ev.slot,
                kind_label(ev.kind),
                ev.x,
                ev.y,
                ev.width
            );
        }
        Ok(report)
    }
}

impl<I: I2c, C: Clock> TouchDevice for St1663i<I, C> {
    type Error = TouchError;

    async fn poll(&mut self) -> Result<TouchReport, Self::Error> {
        self.read_point().await
    }

    fn info(&self) -> TouchInfo {
        self.config.info()
    }
}

fn kind_label(kind: platform::TouchEventKind) -> &'static str {
    match kind {
        platform::TouchEventKind::None => "none",
        platform::TouchEventKind::Down => "down",
        platform::TouchEventKind::Move => "move",
        platform::TouchEventKind::Up => "up",
    }
}
