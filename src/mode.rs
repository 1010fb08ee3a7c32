//! Mode controller for the nRF905 control lines.
//!
//! The chip's operating mode is a function of three lines: PWR_UP, TRX_CE and
//! TX_EN. CSN frames SPI transactions. [`ModeController`] owns all four output
//! pins and is the only place in the crate that drives them, so the tracked
//! [`Mode`] always reflects what was last written to the hardware.
//!
//! | PWR_UP | TRX_CE | TX_EN | Mode |
//! |--------|--------|-------|------|
//! | 0      | x      | x     | [`PoweredDown`](Mode::PoweredDown) |
//! | 1      | 0      | x     | [`Standby`](Mode::Standby) |
//! | 1      | 1      | 0     | [`Receiving`](Mode::Receiving) |
//! | 1      | 1      | 1     | [`Transmitting`](Mode::Transmitting) (while pulsed) |
//!
//! Timing is not handled here; the driver inserts the settle delays between
//! transitions.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Line};

/// Operating mode of the nRF905 as driven by the control lines.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Mode {
    /// PWR_UP low. Lowest current, configuration retained.
    #[default]
    PoweredDown,
    /// Powered with TRX_CE low. Ready for SPI access and mode changes.
    Standby,
    /// TX_EN high; a TRX_CE pulse sends the loaded payload.
    Transmitting,
    /// TX_EN low and TRX_CE high; the receiver is listening.
    Receiving,
}

/// The four output lines driving the nRF905.
#[derive(Debug)]
pub struct ControlPins<PWR, CSN, CE, TXEN> {
    /// PWR_UP
    pub pwr: PWR,
    /// CSN, active low
    pub csn: CSN,
    /// TRX_CE
    pub trx_ce: CE,
    /// TX_EN
    pub tx_en: TXEN,
}

/// State machine sequencing the control lines.
#[derive(Debug)]
pub struct ModeController<PWR, CSN, CE, TXEN> {
    pins: ControlPins<PWR, CSN, CE, TXEN>,
    mode: Mode,
}

fn drive<P: OutputPin>(pin: &mut P, line: Line, high: bool) -> Result<(), Error> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|e| Error::line(line, e))
}

impl<PWR, CSN, CE, TXEN> ModeController<PWR, CSN, CE, TXEN>
where
    PWR: OutputPin,
    CSN: OutputPin,
    CE: OutputPin,
    TXEN: OutputPin,
{
    /// Takes ownership of the control lines. No line is driven yet; the chip
    /// is assumed to be powered down until [`park`](Self::park) and a power-up.
    pub fn new(pins: ControlPins<PWR, CSN, CE, TXEN>) -> Self {
        Self {
            pins,
            mode: Mode::PoweredDown,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Gives the pins back.
    pub fn release(self) -> ControlPins<PWR, CSN, CE, TXEN> {
        self.pins
    }

    fn transition(&mut self, to: Mode) {
        if self.mode != to {
            trace!("mode {:?} -> {:?}", self.mode, to);
            self.mode = to;
        }
    }

    /// Drives CSN high and TRX_CE/TX_EN low without touching PWR_UP.
    pub fn park(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.csn, Line::ChipSelect, true)?;
        drive(&mut self.pins.trx_ce, Line::Trigger, false)?;
        drive(&mut self.pins.tx_en, Line::TxEnable, false)?;
        if self.mode != Mode::PoweredDown {
            self.transition(Mode::Standby);
        }
        Ok(())
    }

    /// Asserts PWR_UP. From power-down the chip lands in standby; other modes
    /// are kept.
    pub fn power_up(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.pwr, Line::Power, true)?;
        if self.mode == Mode::PoweredDown {
            self.transition(Mode::Standby);
        }
        Ok(())
    }

    /// Deasserts PWR_UP. Anything in flight is abandoned by the chip.
    pub fn power_down(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.pwr, Line::Power, false)?;
        self.transition(Mode::PoweredDown);
        Ok(())
    }

    /// Drops PWR_UP for a configuration write and returns the mode to resume.
    pub fn suspend(&mut self) -> Result<Mode, Error> {
        let resume = self.mode;
        drive(&mut self.pins.pwr, Line::Power, false)?;
        self.transition(Mode::PoweredDown);
        Ok(resume)
    }

    /// Reasserts PWR_UP after [`suspend`](Self::suspend). The other lines were
    /// not touched, so the chip returns to `resume` (standby if it was off).
    pub fn resume(&mut self, resume: Mode) -> Result<(), Error> {
        drive(&mut self.pins.pwr, Line::Power, true)?;
        self.transition(match resume {
            Mode::PoweredDown => Mode::Standby,
            other => other,
        });
        Ok(())
    }

    /// Asserts CSN, opening an SPI transaction.
    pub fn select(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.csn, Line::ChipSelect, false)
    }

    /// Releases CSN, closing an SPI transaction.
    pub fn deselect(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.csn, Line::ChipSelect, true)
    }

    /// Drives TRX_CE without changing the tracked mode.
    ///
    /// Used for the transmit pulse and for pausing the receiver during a drain.
    pub fn set_trigger(&mut self, high: bool) -> Result<(), Error> {
        drive(&mut self.pins.trx_ce, Line::Trigger, high)
    }

    /// PWR_UP high, TRX_CE low, TX_EN high.
    pub fn enter_transmit(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.pwr, Line::Power, true)?;
        drive(&mut self.pins.trx_ce, Line::Trigger, false)?;
        drive(&mut self.pins.tx_en, Line::TxEnable, true)?;
        self.transition(Mode::Transmitting);
        Ok(())
    }

    /// TX_EN low, TRX_CE high: back to listening after a transmission.
    pub fn finish_transmit(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.tx_en, Line::TxEnable, false)?;
        drive(&mut self.pins.trx_ce, Line::Trigger, true)?;
        self.transition(Mode::Receiving);
        Ok(())
    }

    /// TX_EN low, PWR_UP high, TRX_CE high.
    pub fn enter_receive(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.tx_en, Line::TxEnable, false)?;
        drive(&mut self.pins.pwr, Line::Power, true)?;
        drive(&mut self.pins.trx_ce, Line::Trigger, true)?;
        self.transition(Mode::Receiving);
        Ok(())
    }

    /// TRX_CE low, TX_EN low. Power is left as it is.
    pub fn enter_standby(&mut self) -> Result<(), Error> {
        drive(&mut self.pins.trx_ce, Line::Trigger, false)?;
        drive(&mut self.pins.tx_en, Line::TxEnable, false)?;
        if self.mode != Mode::PoweredDown {
            self.transition(Mode::Standby);
        }
        Ok(())
    }
}
