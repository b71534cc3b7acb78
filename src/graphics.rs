//! embedded-graphics support
//!
//! Pixels are written straight to the panel, one address window each. Pixels off the
//! panel are dropped. Solid filled rectangles, and with them `clear`, are sent as one
//! window and a pixel stream.

use embedded_graphics::{
    drawable::Pixel,
    geometry::Size,
    pixelcolor::{
        raw::{RawData, RawU16},
        Rgb565,
    },
    primitives::Rectangle,
    style::{PrimitiveStyle, Styled},
    DrawTarget,
};
use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;

use crate::{Error, ST77xx};

fn raw(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

impl<SPI, CS, DC, RST, PinError, SpiError> DrawTarget<Rgb565>
    for ST77xx<SPI, CS, DC, RST, PinError, SpiError>
where
    SPI: spi::Write<u8, Error = SpiError>,
    CS: OutputPin<Error = PinError>,
    DC: OutputPin<Error = PinError>,
    RST: OutputPin<Error = PinError>,
{
    type Error = Error<PinError, SpiError>;

    fn draw_pixel(&mut self, pixel: Pixel<Rgb565>) -> Result<(), Self::Error> {
        let Pixel(point, color) = pixel;
        if point.x < 0
            || point.y < 0
            || point.x >= i32::from(self.width())
            || point.y >= i32::from(self.height())
        {
            return Ok(());
        }

        ST77xx::draw_pixel(self, point.x as u16, point.y as u16, raw(color))
    }

    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }

    fn draw_rectangle(
        &mut self,
        item: &Styled<Rectangle, PrimitiveStyle<Rgb565>>,
    ) -> Result<(), Self::Error> {
        let style = &item.style;
        let fill = match (style.fill_color, style.stroke_color) {
            (Some(fill), None) => fill,
            (Some(fill), Some(_)) if style.stroke_width == 0 => fill,
            _ => return self.draw_iter(item),
        };

        let top_left = item.primitive.top_left;
        let bottom_right = item.primitive.bottom_right;
        let x0 = top_left.x.min(bottom_right.x).max(0);
        let y0 = top_left.y.min(bottom_right.y).max(0);
        let x1 = top_left
            .x
            .max(bottom_right.x)
            .min(i32::from(self.width()) - 1);
        let y1 = top_left
            .y
            .max(bottom_right.y)
            .min(i32::from(self.height()) - 1);
        if x0 > x1 || y0 > y1 {
            return Ok(());
        }

        self.fill_rectangle(
            x0 as u16,
            y0 as u16,
            (x1 - x0 + 1) as u16,
            (y1 - y0 + 1) as u16,
            raw(fill),
        )
    }
}
