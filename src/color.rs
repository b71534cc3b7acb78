//! RGB565 colors and interface pixel formats

pub const BLACK: u16 = 0x0000;
pub const BLUE: u16 = 0x001F;
pub const RED: u16 = 0xF800;
pub const GREEN: u16 = 0x07E0;
pub const CYAN: u16 = 0x07FF;
pub const MAGENTA: u16 = 0xF81F;
pub const YELLOW: u16 = 0xFFE0;
pub const WHITE: u16 = 0xFFFF;

/// COLMOD bits selecting the 65K RGB interface format
pub const COLOR_MODE_65K: u8 = 0x50;
/// COLMOD bits selecting 16 bit/pixel on the control interface
pub const COLOR_MODE_16BIT: u8 = 0x05;

/// Packs 8-bit channels into RGB565.
///
/// The low bits of each channel are dropped: 3 from red, 2 from green, 3 from blue.
pub const fn color565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// RGB and control interface color format
#[allow(dead_code, non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorFormat {
    /// RGB interface 65K, 8-bit data but for 16 Bit/Pixel
    RGB65K_CI8Bit = 0b0000_0101,
    /// RGB interface 65K, control interface 12 Bit/pixel
    RGB65K_CI12Bit = 0b0101_0011,
    /// RGB interface 65K, control interface 16 Bit/pixel
    RGB65K_CI16Bit = 0b0101_0101,
    /// RGB interface 65K, control interface 18 Bit/pixel
    RGB65K_CI18Bit = 0b0101_0110,
    /// RGB interface 65K, control interface 16M truncated
    RGB65K_CI16MTrunc = 0b0101_0111,
    /// RGB interface 262K, control interface 12 Bit/pixel
    RGB262K_CI12Bit = 0b0110_0011,
    /// RGB interface 262K, control interface 16 Bit/pixel
    RGB262K_CI16Bit = 0b0110_0101,
    /// RGB interface 262K, control interface 18 Bit/pixel
    RGB262K_CI18Bit = 0b0110_0110,
    /// RGB interface 262K, control interface 16M truncated
    RGB262K_CI16MTrunc = 0b0110_0111,
}

impl ColorFormat {
    /// Get as COLMOD register value
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<ColorFormat> for u8 {
    fn from(format: ColorFormat) -> u8 {
        format.value()
    }
}
