use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::driver::Nrf905;
use crate::error::Error;

/// Runs a blocking loop that samples AM on the provided driver.
///
/// For firmware without a usable pin interrupt. Each iteration calls
/// [`Nrf905::poll()`], which drains the packet and runs the receive handlers
/// on a rising edge, then sleeps for `poll_us` microseconds.
///
/// The driver should already be listening
/// ([`start_receive_mode()`](Nrf905::start_receive_mode)); while it is not,
/// the loop idles without touching the chip.
///
/// # Arguments
/// - `radio`: the driver to poll
/// - `delay`: delay provider for the loop period, separate from the driver's own
/// - `poll_us`: loop period in microseconds; keep it well below the packet
///   interval, AM stays high only until the payload is read
///
/// # Returns
/// Only on failure, with the error that stopped the loop.
///
/// # Example
/// ```rust,ignore
/// radio.attach_received_callback(on_packet)?;
/// radio.start_receive_mode()?;
/// let err = nrf905::watch::run_receive_loop(&mut radio, &mut delay, 100);
/// ```
pub fn run_receive_loop<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D, DL>(
    radio: &mut Nrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>,
    delay: &mut DL,
    poll_us: u32,
) -> Error
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
    DL: DelayNs,
{
    loop {
        if let Err(err) = radio.poll() {
            return err;
        }
        delay.delay_us(poll_us);
    }
}
