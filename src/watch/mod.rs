//! Delivering address-match edges to the driver.
//!
//! The nRF905 signals an incoming packet by raising AM. The driver has to see
//! that edge to drain the payload, and `embedded-hal` 1.0 offers no portable
//! way to subscribe to pin edges. This module provides the two usual ways of
//! wiring it up:
//!
//! - an EXTI/pin-change interrupt that reaches a global driver guarded by a
//!   `critical_section` mutex (`isr` feature, default): see
//!   [`global_nrf905_address_match`] and the [`nrf905_address_match!`] macro
//! - a blocking loop sampling AM with [`Nrf905::poll()`](crate::driver::Nrf905::poll)
//!   (`poll-loop` feature): see [`run_receive_loop`]
//!
//! | Feature    | Edge source      | Main-thread access        |
//! |------------|------------------|---------------------------|
//! | `isr`      | pin interrupt    | [`with_global_nrf905`]    |
//! | `poll-loop`| blocking polling | the loop owns the driver  |

#[cfg(feature = "poll-loop")]
mod poll;
#[cfg(feature = "poll-loop")]
pub use poll::*;

#[cfg(feature = "isr")]
mod isr;
#[cfg(feature = "isr")]
pub use isr::*;

#[cfg(feature = "isr")]
mod macros;
