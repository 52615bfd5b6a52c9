//! Peripheral bus settings
//!
//! Drivers talk to the bus through `embedded-hal-async` traits; these types
//! only describe how the board brings the bus up for a device.

/// Highest I2C clock the driver accepts (Fast-mode Plus)
pub const I2C_MAX_FREQUENCY: u32 = 1_000_000;

/// Highest 7-bit device address
pub const I2C_MAX_ADDRESS: u8 = 0x7F;

/// I2C configuration (7-bit addressing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl I2cConfig {
    /// Fast-mode bus (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// `true` if the board can run the bus at this clock
    pub const fn is_supported(&self) -> bool {
        self.frequency > 0 && self.frequency <= I2C_MAX_FREQUENCY
    }
}
