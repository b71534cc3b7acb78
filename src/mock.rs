//! Recording transport for tests
//!
//! Every pin edge, SPI write and delay lands in one shared log, in call order.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi;
use embedded_hal::digital::v2::OutputPin;

use crate::{DisplayGeometry, ST77xx};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Cs(bool),
    Dc(bool),
    Rst(bool),
    Spi(Vec<u8>),
    Delay(u16),
}

#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub struct MockSpi(Log);

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        MockSpi(log.clone())
    }
}

impl spi::Write<u8> for MockSpi {
    type Error = Infallible;

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        self.0.push(Event::Spi(words.to_vec()));
        Ok(())
    }
}

pub const BUS_FAULT: &str = "bus fault";

/// SPI bus whose every write fails
pub struct FailingSpi;

impl spi::Write<u8> for FailingSpi {
    type Error = &'static str;

    fn write(&mut self, _words: &[u8]) -> Result<(), &'static str> {
        Err(BUS_FAULT)
    }
}

#[derive(Debug, Clone, Copy)]
enum Line {
    Cs,
    Dc,
    Rst,
}

pub struct MockPin {
    log: Log,
    line: Line,
}

impl MockPin {
    pub fn cs(log: &Log) -> Self {
        MockPin {
            log: log.clone(),
            line: Line::Cs,
        }
    }

    pub fn dc(log: &Log) -> Self {
        MockPin {
            log: log.clone(),
            line: Line::Dc,
        }
    }

    pub fn rst(log: &Log) -> Self {
        MockPin {
            log: log.clone(),
            line: Line::Rst,
        }
    }

    fn set(&mut self, level: bool) {
        let event = match self.line {
            Line::Cs => Event::Cs(level),
            Line::Dc => Event::Dc(level),
            Line::Rst => Event::Rst(level),
        };
        self.log.push(event);
    }
}

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set(true);
        Ok(())
    }
}

pub struct MockDelay(Log);

impl DelayMs<u16> for MockDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.0.push(Event::Delay(ms));
    }
}

pub type MockDisplay = ST77xx<MockSpi, MockPin, MockPin, MockPin, Infallible, Infallible>;

/// Display with chip select, the construction events are already cleared from the log
pub fn display(geometry: DisplayGeometry) -> (MockDisplay, MockDelay, Log) {
    let log = Log::default();
    let display = ST77xx::with_cs(
        MockSpi::new(&log),
        MockPin::cs(&log),
        MockPin::dc(&log),
        MockPin::rst(&log),
        geometry,
    )
    .unwrap();
    log.clear();
    (display, MockDelay(log.clone()), log)
}

/// One chip-select bracketed transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub command: Option<u8>,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn command(opcode: u8, data: &[u8]) -> Self {
        Frame {
            command: Some(opcode),
            data: data.to_vec(),
        }
    }

    pub fn data(data: &[u8]) -> Self {
        Frame {
            command: None,
            data: data.to_vec(),
        }
    }
}

/// Folds the log into transactions. Brackets without any SPI traffic are dropped.
pub fn frames(events: &[Event]) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut current: Option<Frame> = None;
    let mut dc = false;
    for event in events {
        match event {
            Event::Cs(false) => current = Some(Frame::default()),
            Event::Cs(true) => {
                if let Some(frame) = current.take() {
                    if frame.command.is_some() || !frame.data.is_empty() {
                        frames.push(frame);
                    }
                }
            }
            Event::Dc(level) => dc = *level,
            Event::Spi(bytes) => {
                let frame = current.as_mut().expect("SPI write outside chip select");
                if dc {
                    frame.data.extend_from_slice(bytes);
                } else {
                    assert_eq!(bytes.len(), 1, "commands are single bytes");
                    assert!(frame.command.is_none(), "two opcodes in one transaction");
                    frame.command = Some(bytes[0]);
                }
            }
            Event::Rst(_) | Event::Delay(_) => {}
        }
    }
    frames
}

/// Single pixel writes as `(x, y, color)`, addresses as sent on the wire
pub fn pixels(frames: &[Frame]) -> Vec<(u16, u16, u16)> {
    fn range(data: &[u8]) -> (u16, u16) {
        (
            u16::from_be_bytes([data[0], data[1]]),
            u16::from_be_bytes([data[2], data[3]]),
        )
    }

    let mut pixels = Vec::new();
    let (mut columns, mut rows) = ((0, 0), (0, 0));
    for frame in frames {
        match frame.command {
            Some(0x2A) => columns = range(&frame.data),
            Some(0x2B) => rows = range(&frame.data),
            Some(_) => {}
            None => {
                if columns.0 == columns.1 && rows.0 == rows.1 && frame.data.len() == 2 {
                    pixels.push((
                        columns.0,
                        rows.0,
                        u16::from_be_bytes([frame.data[0], frame.data[1]]),
                    ));
                }
            }
        }
    }
    pixels
}
