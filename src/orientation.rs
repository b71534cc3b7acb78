//! Memory data access control (MADCTL)
//!
//! The panel supports eight scan orientations built from three flags: row
//! address order (MY), column address order (MX) and row/column exchange (MV).
//! The color order bit is OR-ed on top.

/// Row address order, mirrors the Y axis
pub const MADCTL_MY: u8 = 0b1000_0000;
/// Column address order, mirrors the X axis
pub const MADCTL_MX: u8 = 0b0100_0000;
/// Row/column exchange
pub const MADCTL_MV: u8 = 0b0010_0000;
/// BGR color filter panel
pub const MADCTL_BGR: u8 = 0b0000_1000;

/// Scan orientation, one per 3-bit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// 0
    Normal,
    /// 1
    MirrorX,
    /// 2
    MirrorY,
    /// 3, both axes mirrored
    MirrorXY,
    /// 4
    Swap,
    /// 5
    SwapMirrorX,
    /// 6
    SwapMirrorY,
    /// 7
    SwapMirrorXY,
}

impl Orientation {
    /// Get the MADCTL orientation bits
    pub fn value(self) -> u8 {
        match self {
            Orientation::Normal => 0,
            Orientation::MirrorX => MADCTL_MX,
            Orientation::MirrorY => MADCTL_MY,
            Orientation::MirrorXY => MADCTL_MX | MADCTL_MY,
            Orientation::Swap => MADCTL_MV,
            Orientation::SwapMirrorX => MADCTL_MV | MADCTL_MX,
            Orientation::SwapMirrorY => MADCTL_MV | MADCTL_MY,
            Orientation::SwapMirrorXY => MADCTL_MV | MADCTL_MX | MADCTL_MY,
        }
    }
}

/// Codes above 7 wrap, only the low three bits select the orientation.
impl From<u8> for Orientation {
    fn from(code: u8) -> Self {
        match code & 0b111 {
            0 => Orientation::Normal,
            1 => Orientation::MirrorX,
            2 => Orientation::MirrorY,
            3 => Orientation::MirrorXY,
            4 => Orientation::Swap,
            5 => Orientation::SwapMirrorX,
            6 => Orientation::SwapMirrorY,
            _ => Orientation::SwapMirrorXY,
        }
    }
}

/// Color Order (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb = 0b0000_0000,
    Bgr = 0b0000_1000,
}

impl ColorOrder {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<bool> for ColorOrder {
    /// `true` selects BGR
    fn from(is_bgr: bool) -> Self {
        if is_bgr {
            ColorOrder::Bgr
        } else {
            ColorOrder::Rgb
        }
    }
}

/// MADCTL payload for an orientation and color order
pub fn madctl(orientation: Orientation, color_order: ColorOrder) -> u8 {
    orientation.value() | color_order.value()
}
