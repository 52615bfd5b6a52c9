//! Sitronix ST1663i capacitive touch controller
//!
//! - [`registers`] — register map and touch data block layout
//! - [`snapshot`] — touch data block decoding
//! - [`driver`] — async I²C driver implementing [`platform::TouchDevice`]

pub mod driver;
pub mod registers;
pub mod snapshot;

pub use driver::St1663i;
pub use snapshot::{FingerOverflow, RawSample, Snapshot};
