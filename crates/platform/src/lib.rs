//! Hardware Abstraction Layer (HAL) for the touch panel stack
//!
//! This crate provides trait-based abstractions and shared types for touch
//! input, enabling driver development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Input pipeline (application task)
//!         ↓
//! Touch driver (touch crate: tracker + ST1663i)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (embedded-hal-async I2C, GPIO, Embassy time)
//! ```
//!
//! # Contents
//!
//! - [`TouchDevice`] - Pollable multi-touch panel
//! - [`TouchEvent`] / [`TouchReport`] - Per-poll output records
//! - [`Clock`] - Monotonic timestamps
//! - [`config`] - Board panel configuration
//! - [`peripheral`] - Bus settings
//!
//! # Features
//!
//! - `std`: Enable mocks outside `cfg(test)` (for downstream tests)
//! - `hardware`: Physical hardware marker
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{TouchDevice, TouchEventKind};
//!
//! async fn example<T: TouchDevice>(panel: &mut T) {
//!     if let Ok(report) = panel.poll().await {
//!         let downs = report.count(TouchEventKind::Down);
//!         let _ = downs;
//!     }
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod clock;
pub mod config;
pub mod mocks;
pub mod peripheral;
pub mod touch;

pub use clock::{Clock, EmbassyClock};
pub use config::{ConfigError, PanelConfig};
pub use peripheral::I2cConfig;
pub use touch::{
    FrameStatus, TouchDevice, TouchEvent, TouchEventKind, TouchEvents, TouchInfo, TouchReport,
    TouchType, MAX_TOUCH_POINTS,
};
