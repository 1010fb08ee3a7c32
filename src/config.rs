//! Driver configuration, chip register image, and device address.
//!
//! [`DriverConfig`] holds everything the driver needs besides the hardware
//! handles: the register image written at initialization and the timing used
//! between protocol steps. All values have datasheet-backed defaults.

use crate::consts::{
    ADDRESS_LEN, ADDRESS_OFFSET, CONFIG_LEN, DEFAULT_BYTE_SETTLE_US, DEFAULT_CONFIG,
    DEFAULT_POLL_INTERVAL_US, DEFAULT_POWER_UP_US, DEFAULT_READY_TIMEOUT_US, DEFAULT_SETTLE_US,
};
use crate::error::Error;

/// A 4 byte nRF905 device address.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Builds an address from a byte slice.
    ///
    /// Input longer than 4 bytes is clamped to its first 4 bytes. Shorter input
    /// is rejected with [`Error::AddressTooShort`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let head = bytes
            .get(..ADDRESS_LEN)
            .ok_or(Error::AddressTooShort(bytes.len()))?;
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(head);
        Ok(Self(address))
    }

    /// The raw address bytes, in the order they are written to the chip.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_slice(bytes)
    }
}

/// Mirror of the chip's 10 byte configuration register.
///
/// The contents are treated as an opaque image except for the receive address
/// at bytes 5..=8.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ChipConfig([u8; CONFIG_LEN]);

impl Default for ChipConfig {
    fn default() -> Self {
        Self(DEFAULT_CONFIG)
    }
}

impl ChipConfig {
    /// Wraps a raw register image.
    pub const fn new(bytes: [u8; CONFIG_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw register image.
    pub const fn as_bytes(&self) -> &[u8; CONFIG_LEN] {
        &self.0
    }

    /// The receive address stored at bytes 5..=8.
    pub fn address(&self) -> Address {
        let start = ADDRESS_OFFSET as usize;
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&self.0[start..start + ADDRESS_LEN]);
        Address(address)
    }

    /// Replaces the receive address stored at bytes 5..=8.
    pub fn set_address(&mut self, address: Address) {
        let start = ADDRESS_OFFSET as usize;
        self.0[start..start + ADDRESS_LEN].copy_from_slice(address.as_bytes());
    }

    /// Overwrites `bytes.len()` bytes starting at `offset`.
    pub(crate) fn patch(&mut self, offset: u8, bytes: &[u8]) -> Result<(), Error> {
        let start = offset as usize;
        let range = self
            .0
            .get_mut(start..start + bytes.len())
            .ok_or(Error::ConfigOutOfRange {
                offset,
                len: bytes.len(),
            })?;
        range.copy_from_slice(bytes);
        Ok(())
    }
}

/// Tunable driver settings.
///
/// # Example
/// ```rust
/// use nrf905::config::DriverConfig;
///
/// let config = DriverConfig {
///     byte_settle_us: 20,
///     ready_timeout_us: None, // spin until DR, like a bare busy-wait
///     ..DriverConfig::default()
/// };
/// assert_eq!(config.settle_us, 1);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DriverConfig {
    /// Register image written by `init()`; its address bytes are replaced by
    /// the driver's address.
    pub chip: ChipConfig,
    /// Settle time after a mode change or a TRX_CE edge, in microseconds.
    pub settle_us: u32,
    /// Gap between consecutive byte clocks while draining a received payload.
    pub byte_settle_us: u32,
    /// Wake-up time after PWR is asserted from power-down, in microseconds.
    pub power_up_us: u32,
    /// Upper bound on a data-ready wait. `None` waits forever.
    pub ready_timeout_us: Option<u32>,
    /// Interval between data-ready samples while waiting, in microseconds.
    /// Zero is treated as 1 so `ready_timeout_us` stays a time bound.
    pub poll_interval_us: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            chip: ChipConfig::default(),
            settle_us: DEFAULT_SETTLE_US,
            byte_settle_us: DEFAULT_BYTE_SETTLE_US,
            power_up_us: DEFAULT_POWER_UP_US,
            ready_timeout_us: Some(DEFAULT_READY_TIMEOUT_US),
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
        }
    }
}
