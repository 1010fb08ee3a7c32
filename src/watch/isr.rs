use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::driver::Nrf905;
use crate::error::Error;
use crate::payload::RxPayload;

/// A driver shared between the main thread and an interrupt handler.
pub type GlobalNrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D> =
    Mutex<RefCell<Option<Nrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>>>>;

/// Used to initialize the global static driver for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use nrf905::watch::{GlobalNrf905, global_nrf905_init};
/// use some_hal::{Spi1, Delay, PA1, PA2, PA3, PA4, PB0, PB1, PB2};
///
/// static RADIO: GlobalNrf905<Spi1, PA1, PA2, PA3, PA4, PB0, PB1, PB2, Delay> =
///     global_nrf905_init();
/// ```
pub const fn global_nrf905_init<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>()
-> GlobalNrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D> {
    Mutex::new(RefCell::new(None))
}

/// Moves a configured driver into the global slot, replacing any previous one.
///
/// Call it from `main()` before enabling the AM interrupt.
pub fn global_nrf905_setup<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>(
    global: &'static GlobalNrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>,
    radio: Nrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>,
) {
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(radio));
    });
}

/// Runs `f` on the global driver inside a critical section.
///
/// Returns `None` if the driver has not been set up yet. This is how the
/// main thread sends packets or changes the address while the interrupt
/// handler may also be using the driver.
///
/// # Example
/// ```rust,ignore
/// with_global_nrf905(&RADIO, |radio| radio.send_packet(&peer, b"ping"));
/// ```
pub fn with_global_nrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D, R>(
    global: &'static GlobalNrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>,
    f: impl FnOnce(&mut Nrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>) -> R,
) -> Option<R> {
    critical_section::with(|cs| global.borrow(cs).borrow_mut().as_mut().map(f))
}

/// Handles an AM rising edge on the global driver.
///
/// Call it from the interrupt handler bound to the AM pin. The packet is
/// drained and dispatched to the receive handlers before it returns.
///
/// # Returns
/// `None` if the driver has not been set up yet, otherwise the result of
/// [`Nrf905::on_address_match()`].
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI1() {
///     let _ = global_nrf905_address_match(&RADIO);
/// }
/// ```
pub fn global_nrf905_address_match<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>(
    global: &'static GlobalNrf905<SPI, PWR, CSN, CE, TXEN, DR, AM, CD, D>,
) -> Option<Result<Option<RxPayload>, Error>>
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
    with_global_nrf905(global, |radio| radio.on_address_match())
}
