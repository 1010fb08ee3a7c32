//! # nrf905
//!
//! A portable, no_std Rust driver for the Nordic nRF905 sub-GHz (433/868/915 MHz)
//! radio transceiver.
//!
//! The driver speaks the chip's SPI instruction set and sequences its control
//! lines using:
//! - `embedded-hal` traits for the SPI bus, digital I/O and delays
//! - an explicit mode state machine for the PWR_UP, TRX_CE and TX_EN lines
//! - interrupt-safe driver access with `critical-section`
//! - optional edge delivery using either a pin interrupt or a polling loop
//!
//! ## Crate features
//! | Feature         | Description |
//! |-----------------|-------------|
//! | `std`           | Disables `#![no_std]` support |
//! | `isr` (default) | Global driver helpers for AM interrupts, using `critical_section::with` |
//! | `poll-loop`     | Blocking receive loop using `embedded_hal::delay::DelayNs` |
//! | `defmt-0-3`     | Uses `defmt` logging |
//! | `log`           | Uses `log` logging |
//!
//! ## Software Features
//!
//! - **Configuration**: full and partial writes of the 10 byte configuration
//!   register, read-back, and a 4 byte receive address
//! - **Transmit**: blocking `send_packet` of up to 32 bytes
//! - **Receive**: AM edge detection, 32 byte payload drain and dispatch to an
//!   ordered list of handlers
//! - Bounded waits on DR, so an unresponsive chip reports an error instead of
//!   hanging the caller
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nrf905::{ControlPins, DriverConfig, Nrf905, StatusPins};
//!
//! let control = ControlPins { pwr, csn, trx_ce, tx_en };
//! let status = StatusPins { dr, am, cd: Some(cd) };
//! let mut radio = Nrf905::new(spi, control, status, delay, DriverConfig::default());
//!
//! radio.set_address(&[0xC0, 0xFF, 0xEE, 0x01])?;
//! radio.init()?;
//! radio.send_packet(&[0xBE, 0xEF, 0x00, 0x01], b"hello")?;
//! ```
//!
//! Receiving needs the AM edges to reach the driver, either from an interrupt
//! handler or from [`watch::run_receive_loop()`](crate::watch):
//!
//! ```rust,ignore
//! fn on_packet(payload: &RxPayload, _: &mut Dispatch<'_>) {
//!     // 32 raw bytes
//! }
//!
//! radio.attach_received_callback(on_packet)?;
//! radio.start_receive_mode()?;
//! let err = nrf905::watch::run_receive_loop(&mut radio, &mut delay, 100);
//! ```
//!
//! ## Integration Notes
//!
//! - Configure the SPI bus for mode 0, MSB first, at 10 MHz or less before
//!   building the driver. CSN is driven by the driver, so pass the raw bus.
//! - Only one driver instance should be active per chip; in interrupt-driven
//!   mode keep it in the global mutex from [`watch`].
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "isr")]
pub use critical_section;

pub mod command;
pub mod config;
pub mod consts;
pub mod driver;
pub mod error;
pub mod handlers;
pub mod mode;
pub mod payload;
pub mod watch;

#[cfg(test)]
mod mock;

pub use config::{Address, ChipConfig, DriverConfig};
pub use driver::{LineStatus, Nrf905, StatusPins};
pub use error::Error;
pub use handlers::{Dispatch, HandlerId, ReceivedHandler};
pub use mode::{ControlPins, Mode};
pub use payload::RxPayload;
