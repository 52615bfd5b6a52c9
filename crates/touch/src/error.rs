//! Driver error type

use embedded_hal::i2c::ErrorKind;
use platform::ConfigError;
use thiserror::Error;

use crate::st1663i::FingerOverflow;

/// Errors raised by the touch driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Bus transfer failed; the poll was aborted.
    #[error("touch controller transfer failed: {0:?}")]
    Transport(ErrorKind),
    /// Controller reported more fingers than the panel supports.
    #[error("controller reported {reported} fingers, panel supports {max}")]
    ProtocolViolation {
        /// Reported finger count
        reported: u8,
        /// Panel capability
        max: u8,
    },
    /// Reset line could not be driven.
    #[error("touch reset pin error")]
    Gpio,
    /// Panel configuration rejected.
    #[error("invalid panel configuration: {0}")]
    InvalidConfig(ConfigError),
}

impl From<ConfigError> for TouchError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

impl From<FingerOverflow> for TouchError {
    fn from(e: FingerOverflow) -> Self {
        Self::ProtocolViolation {
            reported: e.reported,
            max: e.max,
        }
    }
}

impl TouchError {
    /// Map any `embedded-hal` I2C error to [`TouchError::Transport`].
    pub fn transport<E: embedded_hal::i2c::Error>(e: &E) -> Self {
        Self::Transport(e.kind())
    }
}
