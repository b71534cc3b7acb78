use std::{thread, time};

use embedded_hal::digital::v2::OutputPin;
use log::info;
use spidev::{SpiModeFlags, Spidev, SpidevOptions};
use st77xx::color::{BLACK, CYAN, GREEN, RED, WHITE, YELLOW};
use st77xx::{DisplayGeometry, Font, ST77xx};
use sysfs_gpio::{Direction, Pin};

mod font8x8;

// versionFive Gpio
pub const GPIOCHIP_BASE: u8 = 0;
pub const LCD_CS: u8 = GPIOCHIP_BASE + 49;
pub const LCD_RST: u8 = GPIOCHIP_BASE + 42;
pub const LCD_DC: u8 = GPIOCHIP_BASE + 44;
pub const LCD_BL: u8 = GPIOCHIP_BASE + 51;
// versionFive Gpio

struct SysfsPin(Pin);

impl OutputPin for SysfsPin {
    type Error = sysfs_gpio::Error;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_value(0)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_value(1)
    }
}

struct Delay;

impl embedded_hal::blocking::delay::DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        thread::sleep(time::Duration::from_millis(u64::from(ms)));
    }
}

struct Gpio {
    pub pin_cs: SysfsPin,
    pub pin_rst: SysfsPin,
    pub pin_dc: SysfsPin,
    pub pin_bl: SysfsPin,
}

impl Gpio {
    fn new() -> Gpio {
        Gpio {
            pin_cs: SysfsPin(Pin::new(u64::from(LCD_CS))),
            pin_rst: SysfsPin(Pin::new(u64::from(LCD_RST))),
            pin_dc: SysfsPin(Pin::new(u64::from(LCD_DC))),
            pin_bl: SysfsPin(Pin::new(u64::from(LCD_BL))),
        }
    }

    fn init_gpio(&mut self) -> Result<(), sysfs_gpio::Error> {
        for pin in [&self.pin_cs, &self.pin_rst, &self.pin_dc, &self.pin_bl].iter() {
            pin.0.export()?;
            pin.0.set_direction(Direction::Out)?;
        }
        self.pin_cs.0.set_value(1)?;
        self.pin_bl.0.set_value(1)
    }
}

pub struct HardwareSpi {
    pub spi: Spidev,
}

impl HardwareSpi {
    pub fn new(device_name: &str) -> std::io::Result<Self> {
        let mut spi = Spidev::open(device_name)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(30_000_000)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)?;
        Ok(HardwareSpi { spi })
    }
}

impl embedded_hal::blocking::spi::Write<u8> for HardwareSpi {
    type Error = std::io::Error;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        // spidev caps a single transfer at 4096 bytes
        for chunk in words.chunks(4096) {
            std::io::Write::write_all(&mut self.spi, chunk)?;
        }
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut gpio = Gpio::new();
    gpio.init_gpio().expect("[init_gpio] error");
    let device = HardwareSpi::new("/dev/spidev1.0").expect("open /dev/spidev1.0 error");

    let font = Font::new(8, 8, font8x8::FIRST, &font8x8::DATA);
    let mut delay = Delay;
    let mut display = ST77xx::with_cs(
        device,
        gpio.pin_cs,
        gpio.pin_dc,
        gpio.pin_rst,
        DisplayGeometry::new(240, 320),
    )
    .expect("[with_cs] error");

    info!("initializing panel");
    display.init(&mut delay).expect("[init] error");
    display.fill_screen(BLACK).expect("[fill_screen] error");

    display
        .draw_text(&font, "Hello World", 30, 110, WHITE)
        .expect("[draw_text] error");
    thread::sleep(time::Duration::from_secs(2));
    display
        .draw_text(&font, "My name is ST7789", 30, 130, WHITE)
        .expect("[draw_text] error");
    thread::sleep(time::Duration::from_secs(2));

    for i in (0..=10).rev() {
        info!("countdown {}", i);
        display.fill_screen(RED).expect("[fill_screen] error");
        display
            .draw_text(&font, "Countdown:", 60, 90, CYAN)
            .expect("[draw_text] error");
        display
            .draw_text(&font, &i.to_string(), 110, 110, YELLOW)
            .expect("[draw_text] error");
        thread::sleep(time::Duration::from_secs(1));
    }

    display.fill_screen(BLACK).expect("[fill_screen] error");
    display
        .draw_text(&font, "Done!", 90, 120, GREEN)
        .expect("[draw_text] error");

    // release
    display.release().expect("[release display] error");
    // backlight
    gpio.pin_bl.0.unexport().expect("[unexport] error");
}
