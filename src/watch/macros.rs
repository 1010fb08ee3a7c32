/// Declares a static global `NRF905` driver protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `NRF905` suitable for use in
/// interrupt-based environments, where both the main thread and the AM
/// interrupt handler need to reach the driver.
///
/// # Arguments
/// - `$radio`: the concrete driver type, `Nrf905<...>` with the board's pin types
///
/// # Example
/// ```rust,ignore
/// type Radio = nrf905::Nrf905<Spi1, PA1, PA2, PA3, PA4, PB0, PB1, PB2, Delay>;
/// init_nrf905!(Radio);
/// ```
#[macro_export]
macro_rules! init_nrf905 {
    ( $radio:ty ) => {
        pub static NRF905: $crate::critical_section::Mutex<
            ::core::cell::RefCell<Option<$radio>>,
        > = $crate::critical_section::Mutex::new(::core::cell::RefCell::new(None));
    };
}

/// Moves a driver into the global `NRF905` declared by [`init_nrf905!`].
///
/// # Example
/// ```rust,ignore
/// let radio = Nrf905::new(spi, control, status, delay, DriverConfig::default());
/// setup_nrf905!(radio);
/// ```
#[macro_export]
macro_rules! setup_nrf905 {
    ( $radio:expr ) => {
        $crate::critical_section::with(|cs| {
            let _ = NRF905.borrow(cs).replace(Some($radio));
        })
    };
}

/// Calls `on_address_match()` on the global `NRF905` if it has been set up.
///
/// Evaluates to `None` before [`setup_nrf905!`], otherwise to the drain
/// result.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn EXTI1() {
///     if let Some(Err(err)) = nrf905_address_match!() {
///         defmt::warn!("receive failed: {}", err);
///     }
/// }
/// ```
#[macro_export]
macro_rules! nrf905_address_match {
    () => {
        $crate::critical_section::with(|cs| {
            NRF905
                .borrow(cs)
                .borrow_mut()
                .as_mut()
                .map(|radio| radio.on_address_match())
        })
    };
}
