//! ST1663i register map
//!
//! Source: Sitronix ST1663i application note (touch data block layout as
//! used by the Nuvoton board support packages).
//!
//! # Transfers
//!
//! Register pointer writes are one byte. Touch data is read as one
//! `write_read`: the pointer byte `REG_TOUCH_DATA`, then `frame_len(K)`
//! bytes. Configuration registers are written as `[reg, value]`.
//!
//! # Touch data block (starting at `REG_TOUCH_DATA`)
//!
//! | Offset      | Field                                   |
//! |-------------|-----------------------------------------|
//! | 0           | finger count                            |
//! | 1 + 6·n + 0 | sample n: valid flag (non-zero = valid)  |
//! | 1 + 6·n + 1 | sample n: X high byte                   |
//! | 1 + 6·n + 2 | sample n: X low byte                    |
//! | 1 + 6·n + 3 | sample n: Y high byte                   |
//! | 1 + 6·n + 4 | sample n: Y low byte                    |
//! | 1 + 6·n + 5 | sample n: pressure / contact width      |

use platform::MAX_TOUCH_POINTS;

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Device control register (operating mode)
pub const REG_DEVICE_CONTROL: u8 = 0x00;

/// Start of the touch data block
pub const REG_TOUCH_DATA: u8 = 0x10;

// ---------------------------------------------------------------------------
// Register field values
// ---------------------------------------------------------------------------

/// Device control: normal operating mode
pub const DEVICE_CONTROL_NORMAL: u8 = 0x00;

// ---------------------------------------------------------------------------
// Frame layout
// ---------------------------------------------------------------------------

/// Bytes before the first sample
pub const FRAME_HEADER_LEN: usize = 1;

/// Bytes per finger sample
pub const SAMPLE_LEN: usize = 6;

/// Offsets within one sample
pub const SAMPLE_VALID: usize = 0;
/// X high byte
pub const SAMPLE_X_HIGH: usize = 1;
/// X low byte
pub const SAMPLE_X_LOW: usize = 2;
/// Y high byte
pub const SAMPLE_Y_HIGH: usize = 3;
/// Y low byte
pub const SAMPLE_Y_LOW: usize = 4;
/// Pressure / contact width
pub const SAMPLE_PRESSURE: usize = 5;

/// Largest frame the driver ever reads
pub const MAX_FRAME_LEN: usize = FRAME_HEADER_LEN + SAMPLE_LEN * MAX_TOUCH_POINTS;

/// Frame length for a panel with `max_touches` slots, capped at
/// [`MAX_FRAME_LEN`].
#[inline]
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // bounded: max_touches <= MAX_TOUCH_POINTS
pub const fn frame_len(max_touches: u8) -> usize {
    let k = if (max_touches as usize) < MAX_TOUCH_POINTS {
        max_touches as usize
    } else {
        MAX_TOUCH_POINTS
    };
    FRAME_HEADER_LEN + SAMPLE_LEN * k
}

/// Assemble a big-endian coordinate from its register pair
#[inline]
#[must_use]
pub const fn coordinate(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high, low])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_addresses_match_datasheet() {
        assert_eq!(REG_DEVICE_CONTROL, 0x00);
        assert_eq!(REG_TOUCH_DATA, 0x10);
    }

    #[test]
    fn frame_len_for_five_fingers() {
        assert_eq!(frame_len(5), 31);
    }

    #[test]
    fn frame_len_is_capped() {
        assert_eq!(frame_len(200), MAX_FRAME_LEN);
        assert_eq!(MAX_FRAME_LEN, 61);
    }

    #[test]
    fn coordinate_is_high_then_low() {
        assert_eq!(coordinate(0x03, 0x20), 800);
        assert_eq!(coordinate(0x00, 0x64), 100);
    }
}
