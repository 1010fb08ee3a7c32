//! Constants shared across the nRF905 protocol implementation.
//!
//! This module defines the sizes and offsets of the chip's register images,
//! the default configuration written by [`init`](crate::driver::Nrf905::init),
//! and the default timing values used between protocol steps.
//!
//! ## Key Concepts
//!
//! - **Configuration image**: 10 bytes written with the `WC` instruction.
//!   Bytes 5..=8 hold this node's receive address.
//! - **Payload widths**: the receive payload is always drained as 32 bytes;
//!   transmit payloads may be shorter but never longer.
//! - **Timing**: settle delays are tunable defaults, not protocol constants.
//!   They can be overridden through [`DriverConfig`](crate::config::DriverConfig).

/// Length (in bytes) of the chip configuration register image.
pub const CONFIG_LEN: usize = 10;

/// Length (in bytes) of a device address on the air interface.
pub const ADDRESS_LEN: usize = 4;

/// Offset of the receive address inside the configuration image.
///
/// Partial writes of the address use this as the `WC` start offset.
pub const ADDRESS_OFFSET: u8 = 5;

/// Number of bytes drained from the chip for every received packet.
pub const RX_PAYLOAD_LEN: usize = 32;

/// Largest payload accepted by the transmit payload register.
pub const TX_PAYLOAD_MAX: usize = 32;

/// Configuration image written by `init()`.
///
/// Channel 0x1CE in the 433 MHz band at +10 dBm, 4 byte RX/TX address widths,
/// 32 byte RX/TX payload widths, zero RX address, 8 bit CRC, 16 MHz crystal.
pub const DEFAULT_CONFIG: [u8; CONFIG_LEN] =
    [0xCE, 0x0D, 0x44, 0x20, 0x20, 0x00, 0x00, 0x00, 0x00, 0x58];

/// Maximum number of receive handlers held by a
/// [`HandlerRegistry`](crate::handlers::HandlerRegistry).
pub const MAX_HANDLERS: usize = 8;

/// Default settle time after a control line change, in microseconds.
pub const DEFAULT_SETTLE_US: u32 = 1;

/// Default gap between consecutive byte clocks of a receive drain, in microseconds.
pub const DEFAULT_BYTE_SETTLE_US: u32 = 10;

/// Default wake-up time after asserting PWR, in microseconds (datasheet: 3 ms).
pub const DEFAULT_POWER_UP_US: u32 = 3_000;

/// Default bound on a data-ready wait, in microseconds.
pub const DEFAULT_READY_TIMEOUT_US: u32 = 100_000;

/// Default interval between data-ready samples, in microseconds.
pub const DEFAULT_POLL_INTERVAL_US: u32 = 10;
