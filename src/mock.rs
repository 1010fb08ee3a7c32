//! Mock hardware shared by the unit tests.

use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind as SpiErrorKind, ErrorType, SpiBus};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

use crate::config::DriverConfig;
use crate::consts::RX_PAYLOAD_LEN;
use crate::driver::{Nrf905, StatusPins};
use crate::mode::ControlPins;

pub(crate) type TestRadio = Nrf905<
    SpiMock<u8>,
    PinMock,
    PinMock,
    PinMock,
    PinMock,
    PinMock,
    PinMock,
    PinMock,
    NoopDelay,
>;

/// Expected traffic on the bus and on every line.
#[derive(Default)]
pub(crate) struct Script {
    pub(crate) spi: Vec<SpiTransaction<u8>>,
    pub(crate) pwr: Vec<PinTransaction>,
    pub(crate) csn: Vec<PinTransaction>,
    pub(crate) ce: Vec<PinTransaction>,
    pub(crate) txen: Vec<PinTransaction>,
    pub(crate) dr: Vec<PinTransaction>,
    pub(crate) am: Vec<PinTransaction>,
    pub(crate) cd: Option<Vec<PinTransaction>>,
}

pub(crate) struct Mocks {
    pub(crate) spi: SpiMock<u8>,
    pub(crate) pwr: PinMock,
    pub(crate) csn: PinMock,
    pub(crate) ce: PinMock,
    pub(crate) txen: PinMock,
    pub(crate) dr: PinMock,
    pub(crate) am: PinMock,
    pub(crate) cd: Option<PinMock>,
}

impl Mocks {
    pub(crate) fn done(&mut self) {
        self.spi.done();
        self.pwr.done();
        self.csn.done();
        self.ce.done();
        self.txen.done();
        self.dr.done();
        self.am.done();
        if let Some(cd) = self.cd.as_mut() {
            cd.done();
        }
    }
}

impl Script {
    pub(crate) fn build(self) -> (TestRadio, Mocks) {
        self.build_with(DriverConfig::default())
    }

    pub(crate) fn build_with(self, config: DriverConfig) -> (TestRadio, Mocks) {
        let mocks = self.mocks();
        let radio = mocks.radio(mocks.spi.clone(), NoopDelay, config);
        (radio, mocks)
    }

    pub(crate) fn mocks(self) -> Mocks {
        Mocks {
            spi: SpiMock::new(&self.spi),
            pwr: PinMock::new(&self.pwr),
            csn: PinMock::new(&self.csn),
            ce: PinMock::new(&self.ce),
            txen: PinMock::new(&self.txen),
            dr: PinMock::new(&self.dr),
            am: PinMock::new(&self.am),
            cd: self.cd.as_ref().map(PinMock::new),
        }
    }
}

impl Mocks {
    /// Builds a driver over the pin mocks with any bus and delay.
    pub(crate) fn radio<S, D>(
        &self,
        spi: S,
        delay: D,
        config: DriverConfig,
    ) -> Nrf905<S, PinMock, PinMock, PinMock, PinMock, PinMock, PinMock, PinMock, D>
    where
        S: SpiBus<u8>,
        D: DelayNs,
    {
        Nrf905::new(
            spi,
            ControlPins {
                pwr: self.pwr.clone(),
                csn: self.csn.clone(),
                trx_ce: self.ce.clone(),
                tx_en: self.txen.clone(),
            },
            StatusPins {
                dr: self.dr.clone(),
                am: self.am.clone(),
                cd: self.cd.clone(),
            },
            delay,
            config,
        )
    }
}

/// Delay that records every wait, in microseconds.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingDelay(Arc<Mutex<Vec<u32>>>);

impl RecordingDelay {
    pub(crate) fn calls(&self) -> Vec<u32> {
        self.0.lock().unwrap().clone()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.lock().unwrap().push(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.lock().unwrap().push(us);
    }
}

/// SPI bus whose `fail_at`-th `transfer_in_place` (1-based) fails with an
/// overrun; everything else goes to the wrapped mock.
#[derive(Debug)]
pub(crate) struct FaultySpi {
    inner: SpiMock<u8>,
    fail_at: usize,
    transfers: usize,
}

impl FaultySpi {
    pub(crate) fn new(inner: SpiMock<u8>, fail_at: usize) -> Self {
        Self {
            inner,
            fail_at,
            transfers: 0,
        }
    }
}

impl ErrorType for FaultySpi {
    type Error = SpiErrorKind;
}

impl SpiBus<u8> for FaultySpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), SpiErrorKind> {
        self.inner.read(words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), SpiErrorKind> {
        self.inner.write(words)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SpiErrorKind> {
        self.inner.transfer(read, write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SpiErrorKind> {
        self.transfers += 1;
        if self.transfers == self.fail_at {
            return Err(SpiErrorKind::Overrun);
        }
        self.inner.transfer_in_place(words)
    }

    fn flush(&mut self) -> Result<(), SpiErrorKind> {
        self.inner.flush()
    }
}

pub(crate) fn high() -> PinTransaction {
    PinTransaction::set(PinState::High)
}

pub(crate) fn low() -> PinTransaction {
    PinTransaction::set(PinState::Low)
}

pub(crate) fn reads(states: &[PinState]) -> Vec<PinTransaction> {
    states.iter().map(|&s| PinTransaction::get(s)).collect()
}

/// `n` chip-select windows.
pub(crate) fn frames(n: usize) -> Vec<PinTransaction> {
    (0..n).flat_map(|_| [low(), high()]).collect()
}

pub(crate) fn write(bytes: &[u8]) -> SpiTransaction<u8> {
    SpiTransaction::write_vec(bytes.to_vec())
}

pub(crate) fn drain(block: &[u8; RX_PAYLOAD_LEN]) -> Vec<SpiTransaction<u8>> {
    let mut spi = vec![write(&[0x24])];
    spi.extend(
        block
            .iter()
            .map(|&b| SpiTransaction::transfer_in_place(vec![0x00], vec![b])),
    );
    spi.push(SpiTransaction::flush());
    spi
}

pub(crate) fn counting_block() -> [u8; RX_PAYLOAD_LEN] {
    core::array::from_fn(|i| i as u8)
}

