/// ST77xx instruction set used by this driver
#[allow(dead_code, non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Software reset
    SWRESET = 0x01,
    /// Sleep in
    SLPIN = 0x10,
    /// Sleep out
    SLPOUT = 0x11,
    /// Partial display mode on
    PTLON = 0x12,
    /// Normal display mode on
    NORON = 0x13,
    /// Display inversion off
    INVOFF = 0x20,
    /// Display inversion on
    INVON = 0x21,
    /// Display off
    DISPOFF = 0x28,
    /// Display on
    DISPON = 0x29,
    /// Column address set
    CASET = 0x2A,
    /// Row address set
    RASET = 0x2B,
    /// Memory write
    RAMWR = 0x2C,
    /// Memory data access control
    MADCTL = 0x36,
    /// Idle mode off
    IDMOFF = 0x38,
    /// Idle mode on
    IDMON = 0x39,
    /// Interface pixel format
    COLMOD = 0x3A,
}

impl Command {
    /// Get the opcode as sent on the wire
    pub fn value(self) -> u8 {
        self as u8
    }
}
