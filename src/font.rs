//! Monospaced 1-bit bitmap fonts
//!
//! A font is a flat byte table: one byte per glyph row, `height` rows per glyph, glyphs
//! ordered by character code starting at `first`. The most significant bit of a row is
//! the leftmost pixel. Set bits are drawn in the text color, clear bits are left alone so
//! whatever is on the panel shows through.
//!
//! Characters the table does not cover are skipped silently, the cursor still advances.

use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;
use log::trace;

use crate::{Error, ST77xx};

/// Glyph table of a fixed width bitmap font
#[derive(Debug, Clone, Copy)]
pub struct Font<'a> {
    width: u16,
    height: u16,
    first: u32,
    data: &'a [u8],
}

impl<'a> Font<'a> {
    /// `width` is the cursor advance in pixels, `height` the number of row bytes per
    /// glyph and `first` the code of the first glyph in `data`.
    pub const fn new(width: u16, height: u16, first: u32, data: &'a [u8]) -> Self {
        Font {
            width,
            height,
            first,
            data,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn first(&self) -> u32 {
        self.first
    }

    /// Number of glyphs in the table
    pub fn len(&self) -> usize {
        match self.height {
            0 => 0,
            h => self.data.len() / usize::from(h),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row bytes of the glyph for `c`, `None` outside the table
    pub fn glyph(&self, c: char) -> Option<&'a [u8]> {
        let index = (c as u32).checked_sub(self.first)? as usize;
        if index >= self.len() {
            return None;
        }
        let height = usize::from(self.height);
        Some(&self.data[index * height..(index + 1) * height])
    }
}

impl<SPI, CS, DC, RST, PinError, SpiError> ST77xx<SPI, CS, DC, RST, PinError, SpiError>
where
    SPI: spi::Write<u8, Error = SpiError>,
    CS: OutputPin<Error = PinError>,
    DC: OutputPin<Error = PinError>,
    RST: OutputPin<Error = PinError>,
{
    /// Draws one character with its top left corner at `(x, y)`.
    ///
    /// Every set bit costs one pixel write.
    pub fn draw_char(
        &mut self,
        font: &Font<'_>,
        c: char,
        x: u16,
        y: u16,
        color: u16,
    ) -> Result<(), Error<PinError, SpiError>> {
        let glyph = match font.glyph(c) {
            Some(glyph) => glyph,
            None => {
                trace!("no glyph for {:?}", c);
                return Ok(());
            }
        };

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u16 {
                if bits & (0x80 >> col) != 0 {
                    self.draw_pixel(x.wrapping_add(col), y.wrapping_add(row as u16), color)?;
                }
            }
        }

        Ok(())
    }

    /// Draws `text` left to right on one line and returns the x position after the last
    /// character.
    ///
    /// There is no wrapping and no clipping.
    pub fn draw_text(
        &mut self,
        font: &Font<'_>,
        text: &str,
        x: u16,
        y: u16,
        color: u16,
    ) -> Result<u16, Error<PinError, SpiError>> {
        let mut x = x;
        for c in text.chars() {
            self.draw_char(font, c, x, y, color)?;
            x = x.wrapping_add(font.width());
        }

        Ok(x)
    }
}
