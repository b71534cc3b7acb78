use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;
use log::debug;

use crate::color::{BLACK, COLOR_MODE_16BIT, COLOR_MODE_65K};
use crate::{ColorOrder, Error, Orientation, ST77xx};

/// ST7789 power-on sequence.
///
/// Runs once after power up. Each wait is the time the controller needs before it
/// accepts the next command, none of them may be shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ST7789 {
    /// COLMOD value
    pub color_mode: u8,
    pub orientation: Orientation,
    pub color_order: ColorOrder,
    /// Frame memory holds garbage after power up, it is filled with this color before
    /// the display is switched on
    pub baseline: u16,
}

impl Default for ST7789 {
    fn default() -> Self {
        ST7789 {
            color_mode: COLOR_MODE_65K | COLOR_MODE_16BIT,
            orientation: Orientation::MirrorXY,
            color_order: ColorOrder::Rgb,
            baseline: BLACK,
        }
    }
}

impl ST7789 {
    /// Initialize the display
    pub fn init<SPI, CS, DC, RST, PinError, SpiError, DELAY>(
        &self,
        display: &mut ST77xx<SPI, CS, DC, RST, PinError, SpiError>,
        delay: &mut DELAY,
    ) -> Result<(), Error<PinError, SpiError>>
    where
        SPI: spi::Write<u8, Error = SpiError>,
        CS: OutputPin<Error = PinError>,
        DC: OutputPin<Error = PinError>,
        RST: OutputPin<Error = PinError>,
        DELAY: DelayMs<u16>,
    {
        debug!("ST7789 init {:?}", self);
        display
            .hard_reset(delay)?
            .soft_reset(delay)?
            .set_sleep(false)?
            .set_color_mode(self.color_mode)?;
        delay.delay_ms(50);

        // this panel needs inversion on for correct colors
        display
            .set_memory_access_mode(self.orientation, self.color_order)?
            .set_inversion(true)?;
        delay.delay_ms(10);

        display.normal_mode()?;
        delay.delay_ms(10);

        display.fill_screen(self.baseline)?;
        display.display_on()?;
        delay.delay_ms(500);
        debug!("ST7789 ready");

        Ok(())
    }
}

impl<SPI, CS, DC, RST, PinError, SpiError> ST77xx<SPI, CS, DC, RST, PinError, SpiError>
where
    SPI: spi::Write<u8, Error = SpiError>,
    CS: OutputPin<Error = PinError>,
    DC: OutputPin<Error = PinError>,
    RST: OutputPin<Error = PinError>,
{
    /// Initialize the display with the default ST7789 sequence
    pub fn init<DELAY>(&mut self, delay: &mut DELAY) -> Result<(), Error<PinError, SpiError>>
    where
        DELAY: DelayMs<u16>,
    {
        ST7789::default().init(self, delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RED;
    use crate::mock::{self, Event, Frame};
    use crate::DisplayGeometry;

    /// Commands, delays and reset edges in call order, payloads left out
    fn timeline(events: &[Event]) -> Vec<String> {
        let mut dc = false;
        let mut steps = Vec::new();
        for event in events {
            match event {
                Event::Dc(level) => dc = *level,
                Event::Spi(bytes) if !dc => steps.push(format!("cmd {:02x}", bytes[0])),
                Event::Delay(ms) => steps.push(format!("wait {}", ms)),
                Event::Rst(level) => steps.push(format!("rst {}", *level as u8)),
                _ => {}
            }
        }
        steps
    }

    #[test]
    fn init_order() {
        let (mut display, mut delay, log) = mock::display(DisplayGeometry::new(24, 32));
        display.init(&mut delay).unwrap();

        assert_eq!(
            timeline(&log.events()),
            vec![
                "rst 1", "wait 50", "rst 0", "wait 50", "rst 1", "wait 150", //
                "cmd 01", "wait 150", //
                "cmd 11", "cmd 3a", "wait 50", //
                "cmd 36", "cmd 21", "wait 10", //
                "cmd 13", "wait 10", //
                "cmd 2a", "cmd 2b", "cmd 2c", //
                "cmd 29", "wait 500",
            ]
        );
    }

    #[test]
    fn init_payloads() {
        let (mut display, mut delay, log) = mock::display(DisplayGeometry::new(24, 32));
        display.init(&mut delay).unwrap();

        let frames = mock::frames(&log.events());
        assert!(frames.contains(&Frame::command(0x3A, &[0x55])));
        assert!(frames.contains(&Frame::command(0x36, &[0xC0])));
        assert!(frames.contains(&Frame::command(0x2A, &[0, 0, 0, 23])));
        assert!(frames.contains(&Frame::command(0x2B, &[0, 0, 0, 31])));

        let cleared: usize = frames
            .iter()
            .filter(|f| f.command.is_none())
            .map(|f| f.data.len())
            .sum();
        assert_eq!(cleared, 24 * 32 * 2);
        assert!(frames
            .iter()
            .filter(|f| f.command.is_none())
            .all(|f| f.data.iter().all(|b| *b == 0)));
    }

    #[test]
    fn custom_sequence() {
        let (mut display, mut delay, log) = mock::display(DisplayGeometry::new(4, 4));
        let init = ST7789 {
            orientation: Orientation::Swap,
            color_order: ColorOrder::Bgr,
            baseline: RED,
            ..ST7789::default()
        };
        init.init(&mut display, &mut delay).unwrap();

        let frames = mock::frames(&log.events());
        assert!(frames.contains(&Frame::command(0x36, &[0x28])));
        assert!(frames.contains(&Frame::data(&[0xF8u8, 0x00].repeat(16))));
    }
}
