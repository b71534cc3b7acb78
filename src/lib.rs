//! Platform agnostic driver for ST77xx SPI LCD controllers.
//!
//! [`ST77xx`] speaks the command protocol shared by the family: chip-select framed
//! command/data transactions, address windows and pixel streaming. The ST7789 power-on
//! sequence lives in [`ST7789`], text rendering with 1-bit bitmap fonts in [`font`].
//!
//! The bus and pins are taken as `embedded-hal` blocking traits, delays are passed to the
//! operations that need them. Nothing is buffered: every drawing call opens its own
//! address window and streams straight to the panel.
#![deny(unsafe_code)]
#![cfg_attr(not(test), no_std)]

use core::marker::PhantomData;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;
use log::{debug, trace};

mod command;
pub use crate::command::Command;

pub mod color;
pub use crate::color::{color565, ColorFormat};

pub mod orientation;
pub use crate::orientation::{ColorOrder, Orientation};

pub mod font;
pub use crate::font::Font;

mod st7789;
pub use crate::st7789::ST7789;

#[cfg(feature = "graphics")]
mod graphics;

#[cfg(test)]
mod mock;

/// Pixels per transaction when filling rectangles
const FILL_BATCH: usize = 256;

const RESET_PULSE_MS: u16 = 50;
const RESET_SETTLE_MS: u16 = 150;
const SOFT_RESET_MS: u16 = 150;

/// Errors
#[derive(Debug)]
pub enum Error<PinError, SpiError> {
    /// Column start address after column end address
    InvalidColumnAddress,
    /// Row start address after row end address
    InvalidRowAddress,
    /// Buffer length does not match `width * height * 2`
    InvalidBufferLength,
    /// Pin error
    Pin(PinError),
    /// SPI error
    Spi(SpiError),
}

/// Panel size and the offset of the visible area inside controller memory.
///
/// Many ST7789 modules use a 240x240 or 135x240 glass on a 240x320 controller, the
/// offset shifts every column and row address sent to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub width: u16,
    pub height: u16,
    pub x_offset: u16,
    pub y_offset: u16,
}

impl DisplayGeometry {
    pub const fn new(width: u16, height: u16) -> Self {
        DisplayGeometry {
            width,
            height,
            x_offset: 0,
            y_offset: 0,
        }
    }

    pub const fn with_offset(self, x_offset: u16, y_offset: u16) -> Self {
        DisplayGeometry {
            x_offset,
            y_offset,
            ..self
        }
    }
}

/// Stand-in for an unconnected chip select line
#[derive(Debug)]
pub struct NoCs<E>(PhantomData<E>);

impl<E> OutputPin for NoCs<E> {
    type Error = E;

    fn set_low(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), E> {
        Ok(())
    }
}

/// ST77xx display driver config
pub struct ST77xxConfig<CS, DC, RST>
where
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Chip Select pin
    cs: Option<CS>,
    /// Data/Command pin
    dc: DC,
    /// Reset pin
    rst: RST,
}

impl<DC, RST, PinError> ST77xxConfig<NoCs<PinError>, DC, RST>
where
    DC: OutputPin<Error = PinError>,
    RST: OutputPin<Error = PinError>,
{
    /// Create a new display config, the chip is assumed to be permanently selected
    pub fn new(dc: DC, rst: RST) -> Self {
        ST77xxConfig { cs: None, dc, rst }
    }
}

impl<CS, DC, RST> ST77xxConfig<CS, DC, RST>
where
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a new display config with chip select pin
    pub fn with_cs(cs: CS, dc: DC, rst: RST) -> Self {
        ST77xxConfig {
            cs: Some(cs),
            dc,
            rst,
        }
    }

    /// Release the chip select, data/command and reset pins
    pub fn release(self) -> (Option<CS>, DC, RST) {
        (self.cs, self.dc, self.rst)
    }
}

/// ST77xx display driver
pub struct ST77xx<SPI, CS, DC, RST, PinError, SpiError>
where
    SPI: spi::Write<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// SPI
    spi: SPI,
    /// Config
    cfg: ST77xxConfig<CS, DC, RST>,
    geometry: DisplayGeometry,

    _pin_err: PhantomData<PinError>,
    _spi_err: PhantomData<SpiError>,
}

impl<SPI, DC, RST, PinError, SpiError> ST77xx<SPI, NoCs<PinError>, DC, RST, PinError, SpiError>
where
    SPI: spi::Write<u8, Error = SpiError>,
    DC: OutputPin<Error = PinError>,
    RST: OutputPin<Error = PinError>,
{
    /// Creates a new display instance for a panel without chip select line
    pub fn new(spi: SPI, dc: DC, rst: RST, geometry: DisplayGeometry) -> Self {
        ST77xx {
            spi,
            cfg: ST77xxConfig::new(dc, rst),
            geometry,
            _pin_err: PhantomData,
            _spi_err: PhantomData,
        }
    }
}

impl<SPI, CS, DC, RST, PinError, SpiError> ST77xx<SPI, CS, DC, RST, PinError, SpiError>
where
    SPI: spi::Write<u8, Error = SpiError>,
    CS: OutputPin<Error = PinError>,
    DC: OutputPin<Error = PinError>,
    RST: OutputPin<Error = PinError>,
{
    /// Creates a new display instance with chip select pin. The chip starts deselected.
    pub fn with_cs(
        spi: SPI,
        cs: CS,
        dc: DC,
        rst: RST,
        geometry: DisplayGeometry,
    ) -> Result<Self, Error<PinError, SpiError>> {
        Self::with_config(spi, ST77xxConfig::with_cs(cs, dc, rst), geometry)
    }

    /// Creates a new display instance using a previously build display config
    pub fn with_config(
        spi: SPI,
        mut cfg: ST77xxConfig<CS, DC, RST>,
        geometry: DisplayGeometry,
    ) -> Result<Self, Error<PinError, SpiError>> {
        if let Some(cs) = cfg.cs.as_mut() {
            cs.set_high().map_err(Error::Pin)?;
        }

        Ok(ST77xx {
            spi,
            cfg,
            geometry,
            _pin_err: PhantomData,
            _spi_err: PhantomData,
        })
    }

    /// Release the SPI bus and display config. This will also raise the chip select pin.
    pub fn release(
        mut self,
    ) -> Result<(SPI, ST77xxConfig<CS, DC, RST>), Error<PinError, SpiError>> {
        self.cs_high()?;

        Ok((self.spi, self.cfg))
    }

    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    pub fn width(&self) -> u16 {
        self.geometry.width
    }

    pub fn height(&self) -> u16 {
        self.geometry.height
    }

    /// Runs one bus transaction.
    ///
    /// Chip select is held low for the whole transaction: the opcode goes out with
    /// data/command low, the payload with data/command high. Without a command only the
    /// payload phase runs, which streams into a window opened earlier.
    pub fn write(
        &mut self,
        command: Option<Command>,
        data: Option<&[u8]>,
    ) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.cs_low()?;
        if let Some(command) = command {
            self.cfg.dc.set_low().map_err(Error::Pin)?;
            self.spi.write(&[command.value()]).map_err(Error::Spi)?;
        }
        if let Some(data) = data {
            self.cfg.dc.set_high().map_err(Error::Pin)?;
            self.spi.write(data).map_err(Error::Spi)?;
        }
        self.cs_high()?;

        Ok(self)
    }

    /// Sends a command with optional parameters
    pub fn command(
        &mut self,
        cmd: Command,
        params: Option<&[u8]>,
    ) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.write(Some(cmd), params)
    }

    /// Sends raw data without a command
    pub fn data(&mut self, data: &[u8]) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.write(None, Some(data))
    }

    /// Performs a hard reset. The display has to be initialized afterwards.
    pub fn hard_reset<DELAY>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<&mut Self, Error<PinError, SpiError>>
    where
        DELAY: DelayMs<u16>,
    {
        debug!("hard reset");
        self.cs_low()?;
        self.cfg.rst.set_high().map_err(Error::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.cfg.rst.set_low().map_err(Error::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.cfg.rst.set_high().map_err(Error::Pin)?;
        delay.delay_ms(RESET_SETTLE_MS);
        self.cs_high()?;

        Ok(self)
    }

    /// The display module performs a software reset.
    ///
    /// Registers are written with their SW reset default values. Frame memory contens are
    /// unaffected by this command. No command may follow before the controller is done.
    pub fn soft_reset<DELAY>(
        &mut self,
        delay: &mut DELAY,
    ) -> Result<&mut Self, Error<PinError, SpiError>>
    where
        DELAY: DelayMs<u16>,
    {
        debug!("soft reset");
        self.command(Command::SWRESET, None)?;
        delay.delay_ms(SOFT_RESET_MS);

        Ok(self)
    }

    /// Enter (`true`) or leave (`false`) sleep mode.
    ///
    /// In sleep the DC/DC converter, the internal oscillator and the panel scanning are
    /// stopped. The MCU interface and memory keep working.
    pub fn set_sleep(&mut self, enabled: bool) -> Result<&mut Self, Error<PinError, SpiError>> {
        debug!("sleep: {}", enabled);
        let cmd = if enabled {
            Command::SLPIN
        } else {
            Command::SLPOUT
        };
        self.command(cmd, None)
    }

    /// Display inversion on or off
    pub fn set_inversion(
        &mut self,
        enabled: bool,
    ) -> Result<&mut Self, Error<PinError, SpiError>> {
        debug!("inversion: {}", enabled);
        let cmd = if enabled {
            Command::INVON
        } else {
            Command::INVOFF
        };
        self.command(cmd, None)
    }

    /// This sets the RGB interface and control interface color format.
    ///
    /// Bits outside `0x77` are reserved and cleared.
    pub fn set_color_mode(&mut self, mode: u8) -> Result<&mut Self, Error<PinError, SpiError>> {
        debug!("color mode: {:#04x}", mode & 0x77);
        self.command(Command::COLMOD, Some(&[mode & 0x77]))
    }

    /// Define read/write scanning direction of the frame memory.
    pub fn set_memory_access_mode(
        &mut self,
        orientation: Orientation,
        color_order: ColorOrder,
    ) -> Result<&mut Self, Error<PinError, SpiError>> {
        let value = orientation::madctl(orientation, color_order);
        debug!("memory access control: {:?} {:?} ({:#04x})", orientation, color_order, value);
        self.command(Command::MADCTL, Some(&[value]))
    }

    /// Leave partial mode and enter normal mode.
    pub fn normal_mode(&mut self) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.command(Command::NORON, None)
    }

    /// Leave normal mode and enter partial mode.
    pub fn partial_mode(&mut self) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.command(Command::PTLON, None)
    }

    /// Idle mode on or off. In idle mode the panel shows 8 colors only.
    pub fn idle(&mut self, enabled: bool) -> Result<&mut Self, Error<PinError, SpiError>> {
        let cmd = if enabled {
            Command::IDMON
        } else {
            Command::IDMOFF
        };
        self.command(cmd, None)
    }

    /// The LCD enters DISPLAY ON mode. The output from the frame memory is enabled. This
    /// command does not change the frame memory content nor any other status.
    pub fn display_on(&mut self) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.command(Command::DISPON, None)
    }

    /// The LCD enters DISPLAY OFF mode. In this mode, the output from frame memory is
    /// disabled and a blank page is inserted. This command does not change to the frame
    /// memory contents nor any other status.
    pub fn display_off(&mut self) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.command(Command::DISPOFF, None)
    }

    /// Transfer data from MCU to the frame memory.
    pub fn write_memory(&mut self, data: &[u8]) -> Result<&mut Self, Error<PinError, SpiError>> {
        self.command(Command::RAMWR, Some(data))
    }

    /// Sets the address window and leaves the panel waiting for pixel data.
    ///
    /// Both corners are inclusive and panel relative, the geometry offset is added before
    /// they go on the wire. Coordinates past the panel edge are not checked.
    pub fn set_address_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<&mut Self, Error<PinError, SpiError>> {
        if x0 > x1 {
            return Err(Error::InvalidColumnAddress);
        }
        if y0 > y1 {
            return Err(Error::InvalidRowAddress);
        }
        trace!("window ({}, {}) - ({}, {})", x0, y0, x1, y1);

        let DisplayGeometry {
            x_offset, y_offset, ..
        } = self.geometry;
        self.command(
            Command::CASET,
            Some(&encode_pos(
                x0.wrapping_add(x_offset),
                x1.wrapping_add(x_offset),
            )),
        )?
        .command(
            Command::RASET,
            Some(&encode_pos(
                y0.wrapping_add(y_offset),
                y1.wrapping_add(y_offset),
            )),
        )?
        .command(Command::RAMWR, None)?;

        Ok(self)
    }

    /// Sets a single pixel to the given color
    pub fn draw_pixel(
        &mut self,
        x: u16,
        y: u16,
        color: u16,
    ) -> Result<(), Error<PinError, SpiError>> {
        self.set_address_window(x, y, x, y)?
            .data(&color.to_be_bytes())?;

        Ok(())
    }

    /// Fills a rectangle with one color.
    ///
    /// The pixels are streamed in batches of 256, the last batch carries the remainder.
    /// An empty rectangle sends nothing.
    pub fn fill_rectangle(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: u16,
    ) -> Result<(), Error<PinError, SpiError>> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_address_window(x, y, x.wrapping_add(w - 1), y.wrapping_add(h - 1))?;

        let mut batch = [0u8; FILL_BATCH * 2];
        for pixel in batch.chunks_exact_mut(2) {
            pixel.copy_from_slice(&color.to_be_bytes());
        }

        let total = usize::from(w) * usize::from(h);
        let (chunks, rest) = (total / FILL_BATCH, total % FILL_BATCH);
        trace!("fill {} pixels in {} batches + {}", total, chunks, rest);
        for _ in 0..chunks {
            self.data(&batch)?;
        }
        if rest > 0 {
            self.data(&batch[..rest * 2])?;
        }

        Ok(())
    }

    /// Fills the whole panel with one color
    pub fn fill_screen(&mut self, color: u16) -> Result<(), Error<PinError, SpiError>> {
        let DisplayGeometry { width, height, .. } = self.geometry;
        self.fill_rectangle(0, 0, width, height, color)
    }

    /// Copies big-endian RGB565 pixels into a rectangle in a single transaction
    pub fn blit_buffer(
        &mut self,
        buffer: &[u8],
        x: u16,
        y: u16,
        w: u16,
        h: u16,
    ) -> Result<(), Error<PinError, SpiError>> {
        if buffer.len() != usize::from(w) * usize::from(h) * 2 {
            return Err(Error::InvalidBufferLength);
        }
        if buffer.is_empty() {
            return Ok(());
        }
        trace!("blit {} bytes", buffer.len());
        self.set_address_window(x, y, x.wrapping_add(w - 1), y.wrapping_add(h - 1))?
            .data(buffer)?;

        Ok(())
    }

    fn cs_low(&mut self) -> Result<(), Error<PinError, SpiError>> {
        if let Some(cs) = self.cfg.cs.as_mut() {
            cs.set_low().map_err(Error::Pin)?;
        }
        Ok(())
    }

    fn cs_high(&mut self) -> Result<(), Error<PinError, SpiError>> {
        if let Some(cs) = self.cfg.cs.as_mut() {
            cs.set_high().map_err(Error::Pin)?;
        }
        Ok(())
    }
}

/// Start and end address, both big-endian
fn encode_pos(start: u16, end: u16) -> [u8; 4] {
    let [s0, s1] = start.to_be_bytes();
    let [e0, e1] = end.to_be_bytes();
    [s0, s1, e0, e1]
}
