//! nRF905 transceiver driver.
//!
//! This module provides the [`Nrf905`] struct, which frames the chip's SPI
//! instructions, sequences its control lines through a
//! [`ModeController`], and runs the transmit and receive pipelines on top.
//!
//! ## Features
//!
//! - Full and partial configuration writes (`WC` with a start offset)
//! - Blocking transmit: payload, address, TRX_CE pulse, wait for DR
//! - Edge-triggered receive: an AM rising edge drains the 32 byte payload and
//!   hands it to every registered handler
//! - Bounded data-ready waits reporting [`Error::Timeout`] instead of hanging
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! # use embedded_hal_mock::eh1::spi::{Mock as Spi, Transaction as SpiTransaction};
//! use nrf905::config::DriverConfig;
//! use nrf905::driver::{Nrf905, StatusPins};
//! use nrf905::mode::{ControlPins, Mode};
//!
//! # let mut spi = Spi::new(&[
//! #     SpiTransaction::write_vec(vec![0x00]),
//! #     SpiTransaction::write_vec(vec![0xCE, 0x0D, 0x44, 0x20, 0x20, 0xC0, 0xFF, 0xEE, 0x01, 0x58]),
//! #     SpiTransaction::flush(),
//! # ]);
//! # let mut pwr = Pin::new(&[PinTransaction::set(PinState::Low), PinTransaction::set(PinState::High)]);
//! # let mut csn = Pin::new(&[
//! #     PinTransaction::set(PinState::High),
//! #     PinTransaction::set(PinState::Low),
//! #     PinTransaction::set(PinState::High),
//! # ]);
//! # let mut trx_ce = Pin::new(&[PinTransaction::set(PinState::Low)]);
//! # let mut tx_en = Pin::new(&[PinTransaction::set(PinState::Low)]);
//! # let mut dr = Pin::new(&[]);
//! # let mut am = Pin::new(&[]);
//! let control = ControlPins { pwr: pwr.clone(), csn: csn.clone(), trx_ce: trx_ce.clone(), tx_en: tx_en.clone() };
//! let status = StatusPins { dr: dr.clone(), am: am.clone(), cd: None::<Pin> };
//! let mut radio = Nrf905::new(spi.clone(), control, status, NoopDelay, DriverConfig::default());
//!
//! radio.set_address(&[0xC0, 0xFF, 0xEE, 0x01]).unwrap();
//! radio.init().unwrap();
//! assert_eq!(radio.mode(), Mode::Standby);
//! # spi.done(); pwr.done(); csn.done(); trx_ce.done(); tx_en.done(); dr.done(); am.done();
//! ```
//!
//! ## Concurrency
//!
//! Every chip operation takes `&mut self`, so two instruction sequences can
//! never interleave their chip-select windows. When AM edges are delivered from
//! an interrupt, keep the driver behind the `critical_section` mutex provided by
//! [`crate::watch`] and reach it from the main thread the same way.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::command::Instruction;
use crate::config::{Address, ChipConfig, DriverConfig};
use crate::consts::{ADDRESS_LEN, ADDRESS_OFFSET, CONFIG_LEN, RX_PAYLOAD_LEN, TX_PAYLOAD_MAX};
use crate::error::{Error, Line, ReadyWait};
use crate::handlers::{HandlerId, HandlerRegistry, ReceivedHandler};
use crate::mode::{ControlPins, Mode, ModeController};
use crate::payload::RxPayload;

/// The status lines read from the nRF905.
#[derive(Debug)]
pub struct StatusPins<DR, AM, CD> {
    /// DR: data ready
    pub dr: DR,
    /// AM: address match
    pub am: AM,
    /// CD: carrier detect, if wired
    pub cd: Option<CD>,
}

/// Snapshot of the status lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct LineStatus {
    /// AM level
    pub address_match: bool,
    /// DR level
    pub data_ready: bool,
    /// CD level, `None` when the line is not wired
    pub carrier_detect: Option<bool>,
}

/// State of the address-match watch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Watch {
    #[default]
    Disarmed,
    /// Listening for AM rising edges; `last_level` is the last sampled level.
    Armed { last_level: bool },
}

/// Driver for one nRF905 transceiver.
///
/// ## Type Parameters
///
/// - `SPI`: the raw SPI bus; CSN is driven by the driver, not the bus
/// - `PWR`, `CSN`, `CE`, `TXEN`: output pins for PWR_UP, CSN, TRX_CE, TX_EN
/// - `DR`, `AM`, `CD`: input pins for data ready, address match, carrier detect
/// - `D`: busy-delay provider used between protocol steps
#[derive(Debug)]
pub struct Nrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D> {
    spi: SPI,
    lines: ModeController<PWR, CSN, CE, TXEN>,
    inputs: StatusPins<DR, AM, CD>,
    delay: D,
    config: DriverConfig,
    /// Mirror of the chip's configuration register.
    chip: ChipConfig,
    handlers: HandlerRegistry,
    watch: Watch,
    initialized: bool,
}

impl<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D> Nrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>
where
    SPI: SpiBus<u8>,
    PWR: OutputPin,
    CSN: OutputPin,
    CE: OutputPin,
    TXEN: OutputPin,
    DR: InputPin,
    AM: InputPin,
    CD: InputPin,
    D: DelayNs,
{
    /// Creates a driver. No line is driven and nothing is sent until
    /// [`init()`](Self::init).
    ///
    /// The SPI bus must already be configured for mode 0 at no more than 10 MHz.
    pub fn new(
        spi: SPI,
        control: ControlPins<PWR, CSN, CE, TXEN>,
        inputs: StatusPins<DR, AM, CD>,
        delay: D,
        config: DriverConfig,
    ) -> Self {
        Self {
            spi,
            lines: ModeController::new(control),
            inputs,
            delay,
            chip: config.chip,
            config,
            handlers: HandlerRegistry::new(),
            watch: Watch::Disarmed,
            initialized: false,
        }
    }

    /// Releases the bus, pins and delay.
    pub fn release(
        self,
    ) -> (
        SPI,
        ControlPins<PWR, CSN, CE, TXEN>,
        StatusPins<DR, AM, CD>,
        D,
    ) {
        (self.spi, self.lines.release(), self.inputs, self.delay)
    }

    /// Current chip mode.
    pub fn mode(&self) -> Mode {
        self.lines.mode()
    }

    /// This node's receive address.
    pub fn address(&self) -> Address {
        self.chip.address()
    }

    /// The driver's mirror of the configuration register.
    pub fn chip_config(&self) -> &ChipConfig {
        &self.chip
    }

    /// Whether AM edges are currently acted upon.
    pub fn is_listening(&self) -> bool {
        self.watch != Watch::Disarmed
    }

    /// Parks the control lines and writes the full configuration image,
    /// including the address set so far (all zero by default). Leaves the
    /// chip awake in [`Mode::Standby`].
    pub fn init(&mut self) -> Result<(), Error> {
        self.lines.park()?;
        let image = *self.chip.as_bytes();
        self.write_config(0, &image)?;
        self.initialized = true;
        debug!("nRF905 initialized, address {:?}", self.chip.address());
        Ok(())
    }

    /// Sets this node's receive address.
    ///
    /// Input longer than 4 bytes is clamped to its first 4 bytes; shorter input
    /// is rejected before anything is sent. After [`init()`](Self::init) the
    /// address bytes of the configuration register are rewritten in place.
    pub fn set_address(&mut self, address: &[u8]) -> Result<(), Error> {
        let address = Address::from_slice(address)?;
        if self.initialized {
            self.write_config(ADDRESS_OFFSET, address.as_bytes())
        } else {
            self.chip.set_address(address);
            Ok(())
        }
    }

    /// Writes `bytes` into the configuration register starting at `offset`.
    ///
    /// PWR_UP is dropped for the duration of the write and reasserted after
    /// it, resuming the previous mode once the chip has woken up again
    /// (`power_up_us`).
    pub fn write_config(&mut self, offset: u8, bytes: &[u8]) -> Result<(), Error> {
        let mut mirror = self.chip;
        mirror.patch(offset, bytes)?;

        let resume = self.lines.suspend()?;
        let written = self.transaction(|spi, _| {
            spi.write(&[Instruction::WriteConfig.indexed(offset)])
                .map_err(Error::bus)?;
            if !bytes.is_empty() {
                spi.write(bytes).map_err(Error::bus)?;
            }
            Ok(())
        });
        let resumed = self.lines.resume(resume);
        written?;
        resumed?;
        self.delay.delay_us(self.config.power_up_us);

        self.chip = mirror;
        Ok(())
    }

    /// Reads the 10 byte configuration register back from the chip.
    pub fn read_config(&mut self) -> Result<ChipConfig, Error> {
        let mut image = [0u8; CONFIG_LEN];
        self.transaction(|spi, _| {
            spi.write(&[Instruction::ReadConfig.opcode()])
                .map_err(Error::bus)?;
            spi.transfer_in_place(&mut image).map_err(Error::bus)
        })?;
        Ok(ChipConfig::new(image))
    }

    /// Loads the transmit payload register.
    pub fn write_transmit_payload(&mut self, payload: &[u8]) -> Result<(), Error> {
        if payload.len() > TX_PAYLOAD_MAX {
            return Err(Error::PayloadTooLong(payload.len()));
        }
        self.transaction(|spi, _| {
            spi.write(&[Instruction::WriteTxPayload.opcode()])
                .map_err(Error::bus)?;
            if !payload.is_empty() {
                spi.write(payload).map_err(Error::bus)?;
            }
            Ok(())
        })
    }

    /// Loads the transmit address register.
    pub fn write_transmit_address(&mut self, address: Address) -> Result<(), Error> {
        self.transaction(|spi, _| {
            spi.write(&[Instruction::WriteTxAddress.opcode()])
                .map_err(Error::bus)?;
            spi.write(address.as_bytes()).map_err(Error::bus)
        })
    }

    /// Reads back the transmit payload register.
    pub fn read_transmit_payload(&mut self) -> Result<[u8; TX_PAYLOAD_MAX], Error> {
        let mut payload = [0u8; TX_PAYLOAD_MAX];
        self.transaction(|spi, _| {
            spi.write(&[Instruction::ReadTxPayload.opcode()])
                .map_err(Error::bus)?;
            spi.transfer_in_place(&mut payload).map_err(Error::bus)
        })?;
        Ok(payload)
    }

    /// Reads back the transmit address register.
    pub fn read_transmit_address(&mut self) -> Result<Address, Error> {
        let mut address = [0u8; ADDRESS_LEN];
        self.transaction(|spi, _| {
            spi.write(&[Instruction::ReadTxAddress.opcode()])
                .map_err(Error::bus)?;
            spi.transfer_in_place(&mut address).map_err(Error::bus)
        })?;
        Ok(Address::from(address))
    }

    /// Drains the receive payload register.
    ///
    /// Always clocks exactly 32 bytes, one transfer per byte with
    /// `byte_settle_us` after each; the chip needs the gap right after a
    /// receive event.
    pub fn read_received_payload(&mut self) -> Result<RxPayload, Error> {
        let settle_us = self.config.settle_us;
        let byte_settle_us = self.config.byte_settle_us;
        let mut block = [0u8; RX_PAYLOAD_LEN];
        self.transaction(|spi, delay| {
            delay.delay_us(settle_us);
            spi.write(&[Instruction::ReadRxPayload.opcode()])
                .map_err(Error::bus)?;
            delay.delay_us(settle_us);
            for byte in block.iter_mut() {
                spi.transfer_in_place(core::slice::from_mut(byte))
                    .map_err(Error::bus)?;
                delay.delay_us(byte_settle_us);
            }
            Ok(())
        })?;
        Ok(RxPayload::new(block))
    }

    /// Asserts PWR_UP and waits for the chip to wake up.
    pub fn power_up(&mut self) -> Result<(), Error> {
        self.lines.power_up()?;
        self.delay.delay_us(self.config.power_up_us);
        Ok(())
    }

    /// Deasserts PWR_UP and disarms the address-match watch.
    ///
    /// A transmission or drain in progress on the chip is abandoned; the next
    /// transmit or receive call powers the chip up again.
    pub fn power_down(&mut self) -> Result<(), Error> {
        self.watch = Watch::Disarmed;
        self.lines.power_down()
    }

    /// Enables the receiver and arms the address-match watch.
    ///
    /// Calling it again while listening only re-arms the watch. From
    /// power-down the chip is powered up first.
    pub fn start_receive_mode(&mut self) -> Result<(), Error> {
        let was_off = self.lines.mode() == Mode::PoweredDown;
        self.lines.enter_receive()?;
        self.settle(was_off);
        self.watch = Watch::Armed { last_level: false };
        debug!("listening on {:?}", self.chip.address());
        Ok(())
    }

    /// Disarms the address-match watch and returns the chip to standby.
    ///
    /// A drain that already started runs to completion.
    pub fn stop_receive_mode(&mut self) -> Result<(), Error> {
        self.watch = Watch::Disarmed;
        if self.lines.mode() == Mode::Receiving {
            self.lines.enter_standby()?;
        }
        Ok(())
    }

    /// Samples AM and drains a packet on a rising edge.
    ///
    /// Returns `Ok(None)` when there is nothing to do: the watch is disarmed
    /// or no new edge was seen. Call it from a polling loop, or see
    /// [`on_address_match()`](Self::on_address_match) when the edge comes from
    /// an interrupt.
    pub fn poll(&mut self) -> Result<Option<RxPayload>, Error> {
        let Watch::Armed { last_level } = self.watch else {
            return Ok(None);
        };
        let level = self
            .inputs
            .am
            .is_high()
            .map_err(|e| Error::line(Line::AddressMatch, e))?;
        self.watch = Watch::Armed { last_level: level };
        if level && !last_level {
            self.on_address_match()
        } else {
            Ok(None)
        }
    }

    /// Handles an AM rising edge detected elsewhere (e.g. by an EXTI interrupt).
    ///
    /// Edges arriving while the watch is disarmed, or while the chip is not
    /// in [`Mode::Receiving`] (e.g. after a failed transmission), are ignored.
    pub fn on_address_match(&mut self) -> Result<Option<RxPayload>, Error> {
        if self.watch == Watch::Disarmed || self.lines.mode() != Mode::Receiving {
            return Ok(None);
        }
        self.receive_packet().map(Some)
    }

    /// Waits for DR, drains the payload and dispatches it to every handler.
    ///
    /// TRX_CE is held low while draining and raised again afterwards, also
    /// when the drain fails, so the chip keeps listening.
    pub fn receive_packet(&mut self) -> Result<RxPayload, Error> {
        self.wait_data_ready(ReadyWait::PayloadReady)?;

        let drained = self
            .lines
            .set_trigger(false)
            .and_then(|()| self.read_received_payload());
        // CSN is already released here
        self.delay.delay_us(self.config.settle_us);
        let rearmed = self.lines.set_trigger(true);
        self.delay.delay_us(self.config.settle_us);
        let payload = drained?;
        rearmed?;

        debug!("received {:?}", payload.as_bytes());
        self.handlers.dispatch(&payload);
        Ok(payload)
    }

    /// Sends one packet and blocks until the chip reports it sent.
    ///
    /// The address is clamped like [`set_address()`](Self::set_address); the
    /// payload may hold at most 32 bytes. Both are checked before anything is
    /// sent. Afterwards the chip is listening again ([`Mode::Receiving`]).
    pub fn send_packet(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Error> {
        let address = Address::from_slice(address)?;
        if payload.len() > TX_PAYLOAD_MAX {
            return Err(Error::PayloadTooLong(payload.len()));
        }

        let was_off = self.lines.mode() == Mode::PoweredDown;
        self.lines.enter_transmit()?;
        self.settle(was_off);

        match self.transmit(address, payload) {
            Ok(()) => {
                self.lines.finish_transmit()?;
                debug!("packet sent to {:?}", address);
                Ok(())
            }
            Err(err) => {
                // Best effort, the transmit error is what gets reported
                let _ = self.lines.enter_standby();
                Err(err)
            }
        }
    }

    fn transmit(&mut self, address: Address, payload: &[u8]) -> Result<(), Error> {
        self.write_transmit_payload(payload)?;
        self.write_transmit_address(address)?;

        // The TRX_CE pulse starts the transmission
        self.lines.set_trigger(true)?;
        self.delay.delay_us(self.config.settle_us);
        self.lines.set_trigger(false)?;

        self.wait_data_ready(ReadyWait::TransmitComplete)
    }

    /// Adds a receive handler; handlers run in the order they were attached.
    pub fn attach_received_callback(
        &mut self,
        handler: ReceivedHandler,
    ) -> Result<HandlerId, Error> {
        self.handlers.attach(handler)
    }

    /// Removes a receive handler. Returns `false` if it was not attached.
    pub fn detach_received_callback(&mut self, id: HandlerId) -> bool {
        self.handlers.detach(id)
    }

    /// Reads AM, DR and (if wired) CD.
    pub fn status(&mut self) -> Result<LineStatus, Error> {
        let address_match = self
            .inputs
            .am
            .is_high()
            .map_err(|e| Error::line(Line::AddressMatch, e))?;
        let data_ready = self
            .inputs
            .dr
            .is_high()
            .map_err(|e| Error::line(Line::DataReady, e))?;
        let carrier_detect = match self.inputs.cd.as_mut() {
            Some(cd) => Some(
                cd.is_high()
                    .map_err(|e| Error::line(Line::CarrierDetect, e))?,
            ),
            None => None,
        };
        let status = LineStatus {
            address_match,
            data_ready,
            carrier_detect,
        };
        debug!("{:?}", status);
        Ok(status)
    }

    fn settle(&mut self, was_off: bool) {
        let wait = if was_off {
            self.config.settle_us.saturating_add(self.config.power_up_us)
        } else {
            self.config.settle_us
        };
        self.delay.delay_us(wait);
    }

    /// Runs `op` inside one chip-select window.
    ///
    /// CSN is released whatever `op` returns; the first error wins.
    fn transaction<R>(
        &mut self,
        op: impl FnOnce(&mut SPI, &mut D) -> Result<R, Error>,
    ) -> Result<R, Error> {
        let result = self.lines.select().and_then(|()| {
            let value = op(&mut self.spi, &mut self.delay)?;
            self.spi.flush().map_err(Error::bus)?;
            Ok(value)
        });
        let released = self.lines.deselect();
        let value = result?;
        released?;
        Ok(value)
    }

    fn data_ready(&mut self) -> nb::Result<(), Error> {
        if self
            .inputs
            .dr
            .is_high()
            .map_err(|e| Error::line(Line::DataReady, e))?
        {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Spins on DR. Bounded by `ready_timeout_us` when set, sampling every
    /// `poll_interval_us` (at least 1 us); unbounded otherwise.
    fn wait_data_ready(&mut self, cause: ReadyWait) -> Result<(), Error> {
        let Some(limit) = self.config.ready_timeout_us else {
            return nb::block!(self.data_ready());
        };
        let interval = self.config.poll_interval_us.max(1);
        let mut waited: u32 = 0;
        loop {
            match self.data_ready() {
                Ok(()) => return Ok(()),
                Err(nb::Error::Other(err)) => return Err(err),
                Err(nb::Error::WouldBlock) if waited < limit => {
                    self.delay.delay_us(interval);
                    waited = waited.saturating_add(interval);
                }
                Err(nb::Error::WouldBlock) => {
                    warn!("DR stuck low after {} us ({:?})", waited, cause);
                    return Err(Error::Timeout(cause));
                }
            }
        }
    }
}
