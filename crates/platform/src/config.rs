//! Board configuration and constants
//!
//! Central values for the touch panel fitted to the board. Board code
//! should build a [`PanelConfig`] from these rather than hardcoding them.

use crate::peripheral::{I2cConfig, I2C_MAX_ADDRESS, I2C_MAX_FREQUENCY};
use crate::touch::{TouchInfo, TouchType, MAX_TOUCH_POINTS};

/// LCD width in pixels; touch X range
pub const LCD_WIDTH: u16 = 800;

/// LCD height in pixels; touch Y range
pub const LCD_HEIGHT: u16 = 480;

/// Simultaneous touches reported by the panel firmware
pub const PANEL_MAX_TOUCHES: u8 = 5;

/// 7-bit address of the ST1663i touch controller
pub const ST1663I_I2C_ADDR: u8 = 0x55;

/// Reset line held low for this long
pub const RESET_LOW_MS: u32 = 5;

/// Controller boot time after reset is released
pub const RESET_SETTLE_MS: u32 = 200;

/// Everything a touch driver needs from the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Controller bus address
    pub address: u8,
    /// Bus settings the board applies before the driver runs
    pub bus: I2cConfig,
    /// Exclusive upper bound for X
    pub range_x: u16,
    /// Exclusive upper bound for Y
    pub range_y: u16,
    /// Maximum simultaneous touches (K)
    pub max_touches: u8,
    /// Reset pulse width
    pub reset_low_ms: u32,
    /// Wait after reset before the first transfer
    pub reset_settle_ms: u32,
}

/// Reason a [`PanelConfig`] was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `max_touches` is zero or above [`MAX_TOUCH_POINTS`]
    MaxTouches(u8),
    /// A coordinate range is zero
    EmptyRange,
    /// Controller address does not fit 7-bit addressing
    Address(u8),
    /// Bus clock is zero or above [`I2C_MAX_FREQUENCY`]
    BusFrequency(u32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MaxTouches(n) => write!(f, "max_touches {n} outside 1..={MAX_TOUCH_POINTS}"),
            Self::EmptyRange => write!(f, "touch range must be non-zero"),
            Self::Address(a) => write!(f, "address {a:#04x} is not a 7-bit address"),
            Self::BusFrequency(hz) => {
                write!(f, "bus clock {hz} Hz outside 1..={I2C_MAX_FREQUENCY}")
            }
        }
    }
}

impl PanelConfig {
    /// Check the configuration against driver limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_touches == 0 || usize::from(self.max_touches) > MAX_TOUCH_POINTS {
            return Err(ConfigError::MaxTouches(self.max_touches));
        }
        if self.range_x == 0 || self.range_y == 0 {
            return Err(ConfigError::EmptyRange);
        }
        if self.address > I2C_MAX_ADDRESS {
            return Err(ConfigError::Address(self.address));
        }
        if !self.bus.is_supported() {
            return Err(ConfigError::BusFrequency(self.bus.frequency));
        }
        Ok(())
    }

    /// Capability record published for this panel
    pub const fn info(&self) -> TouchInfo {
        TouchInfo {
            kind: TouchType::Capacitive,
            range_x: self.range_x,
            range_y: self.range_y,
            max_touches: self.max_touches,
        }
    }

    /// Override the coordinate ranges (e.g. a different LCD module)
    #[must_use]
    pub const fn with_range(mut self, range_x: u16, range_y: u16) -> Self {
        self.range_x = range_x;
        self.range_y = range_y;
        self
    }

    /// Override K
    #[must_use]
    pub const fn with_max_touches(mut self, max_touches: u8) -> Self {
        self.max_touches = max_touches;
        self
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            address: ST1663I_I2C_ADDR,
            bus: I2cConfig::FAST,
            range_x: LCD_WIDTH,
            range_y: LCD_HEIGHT,
            max_touches: PANEL_MAX_TOUCHES,
            reset_low_ms: RESET_LOW_MS,
            reset_settle_ms: RESET_SETTLE_MS,
        }
    }
}
