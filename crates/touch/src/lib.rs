//! Multi-touch support for the ST1663i panel
//!
//! Converts periodically sampled controller frames into per-slot touch
//! events and delivers them to the input pipeline.
//!
//! ```text
//! interrupt line ──► service::run_touch_loop
//!                          │ poll()
//!                          ▼
//!                    st1663i::St1663i ──I²C──► controller
//!                          │ Snapshot
//!                          ▼
//!                    tracker::TouchTracker ──► TouchReport ──► Channel
//! ```
//!
//! # Features
//!
//! - `defmt`: log through defmt and derive `defmt::Format` (hardware)
//! - `tracing`: log through tracing (desktop / emulator)
//! - `std`: expose the platform mocks outside this crate's tests
//!
//! # Example
//!
//! ```no_run
//! use platform::{EmbassyClock, PanelConfig, TouchDevice};
//! use touch::mock::{MockDelay, MockResetPin, MockTouchBus};
//! use touch::St1663i;
//!
//! async fn bring_up() -> Result<(), touch::TouchError> {
//!     let mut panel = St1663i::new(MockTouchBus::new(), EmbassyClock, PanelConfig::default())?;
//!     panel.init(&mut MockResetPin::new(), &mut MockDelay::new()).await?;
//!     let report = panel.poll().await?;
//!     assert!(report.is_empty());
//!     Ok(())
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

// Must stay first: the logging macros are textually scoped.
#[macro_use]
mod fmt;

pub mod error;
pub mod mock;
pub mod service;
pub mod st1663i;
pub mod tracker;

pub use error::TouchError;
pub use st1663i::{FingerOverflow, RawSample, Snapshot, St1663i};
pub use tracker::{Contact, FingerSlot, TouchTracker};
