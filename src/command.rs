//! nRF905 SPI instruction set.
//!
//! Every bus transaction starts with one instruction byte. The write and read
//! config instructions carry a 4-bit start offset in their low nibble so a
//! partial image can be written from any byte of the configuration register.

/// Instructions accepted by the nRF905 on its SPI interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum Instruction {
    /// Write the configuration register, starting at the offset in the low nibble.
    WriteConfig = 0x00,
    /// Read the configuration register, starting at the offset in the low nibble.
    ReadConfig = 0x10,
    /// Write the transmit payload register.
    WriteTxPayload = 0x20,
    /// Read back the transmit payload register.
    ReadTxPayload = 0x21,
    /// Write the transmit address register.
    WriteTxAddress = 0x22,
    /// Read back the transmit address register.
    ReadTxAddress = 0x23,
    /// Read the received payload register.
    ReadRxPayload = 0x24,
}

impl Instruction {
    /// Returns the bare opcode.
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Returns the opcode with a configuration start offset folded into the low nibble.
    ///
    /// Only the low 4 bits of `offset` are used, matching the chip's indexed
    /// addressing. The offset is meaningful for [`WriteConfig`](Instruction::WriteConfig)
    /// and [`ReadConfig`](Instruction::ReadConfig) only; the payload and address
    /// instructions already occupy their low nibble.
    pub const fn indexed(self, offset: u8) -> u8 {
        self.opcode() | (offset & 0x0F)
    }
}

impl From<Instruction> for u8 {
    fn from(instruction: Instruction) -> u8 {
        instruction.opcode()
    }
}
