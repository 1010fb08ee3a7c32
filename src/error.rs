//! Errors reported by the nRF905 driver.
//!
//! Three kinds of failure are distinguished:
//! - malformed calls, rejected before any bus transaction begins;
//! - an unresponsive chip, when a bounded data-ready wait expires;
//! - hardware access failures from the SPI bus or a control/status line.
//!
//! Hardware errors are reduced to their `embedded-hal` [`ErrorKind`](embedded_hal::spi::ErrorKind)
//! so the error type does not depend on the concrete pin and bus types.
//! "No data yet" is never an error; see [`Nrf905::poll`](crate::driver::Nrf905::poll).

use embedded_hal::{digital, spi};
use thiserror::Error;

/// Control and status lines wired between the MCU and the nRF905.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Line {
    /// PWR_UP: powers the chip up (high) or down (low).
    Power,
    /// CSN: active low SPI chip select.
    ChipSelect,
    /// TRX_CE: starts a transmission (pulse) or enables the receiver (held high).
    Trigger,
    /// TX_EN: selects transmit (high) or receive (low) mode.
    TxEnable,
    /// DR: data ready, set when a packet was received or sent.
    DataReady,
    /// AM: address match, set when an incoming packet carries our address.
    AddressMatch,
    /// CD: carrier detect.
    CarrierDetect,
}

/// The condition a bounded data-ready wait was waiting for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ReadyWait {
    /// DR after a TRX_CE pulse: the packet left the antenna.
    TransmitComplete,
    /// DR after an address match: a valid payload is buffered.
    PayloadReady,
}

/// Errors emitted by the nRF905 driver.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// The address had fewer than 4 bytes.
    #[error("address must be 4 bytes, got {0}")]
    AddressTooShort(usize),

    /// The transmit payload did not fit the 32 byte payload register.
    #[error("payload of {0} bytes exceeds the 32 byte transmit register")]
    PayloadTooLong(usize),

    /// A configuration write would run past the 10 byte register image.
    #[error("config write of {len} bytes at offset {offset} exceeds the 10 byte register")]
    ConfigOutOfRange {
        /// Requested start offset.
        offset: u8,
        /// Requested number of bytes.
        len: usize,
    },

    /// No room left for another receive handler.
    #[error("handler registry is full")]
    RegistryFull,

    /// The chip never raised DR within the configured bound.
    #[error("chip unresponsive: data ready never asserted ({0:?})")]
    Timeout(ReadyWait),

    /// The SPI bus reported a failure.
    #[error("spi bus fault: {0}")]
    Bus(spi::ErrorKind),

    /// Reading or driving a control/status line failed.
    #[error("{0:?} line fault: {1}")]
    Line(Line, digital::ErrorKind),
}

impl Error {
    pub(crate) fn bus<E: spi::Error>(err: E) -> Self {
        Error::Bus(err.kind())
    }

    pub(crate) fn line<E: digital::Error>(line: Line, err: E) -> Self {
        Error::Line(line, err.kind())
    }
}
