//! Received payload block.

use core::ops::Deref;

use crate::consts::RX_PAYLOAD_LEN;

/// The raw 32 byte block drained from the receive payload register.
///
/// No framing is applied; interpreting the bytes is left to the handlers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RxPayload([u8; RX_PAYLOAD_LEN]);

impl RxPayload {
    /// Wraps a raw payload block.
    pub const fn new(bytes: [u8; RX_PAYLOAD_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw payload bytes.
    pub const fn as_bytes(&self) -> &[u8; RX_PAYLOAD_LEN] {
        &self.0
    }

    /// Consumes the payload, returning the raw block.
    pub const fn into_inner(self) -> [u8; RX_PAYLOAD_LEN] {
        self.0
    }
}

impl Deref for RxPayload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for RxPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
