use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::blocking::i2c::Write as I2cWrite;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::Panel;
use crate::error::{Error, Result};

const WIDTH: usize = DISPLAY_WIDTH as usize;
const HEIGHT: usize = DISPLAY_HEIGHT as usize;
const PAGES: usize = HEIGHT / 8;

// Control byte sent ahead of every I2C transfer
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

const DATA_CHUNK: usize = 16;

// Power-on sequence for a 128x64 panel with the internal charge pump
const INIT_SEQUENCE: &[u8] = &[
    0xae, // display off
    0xd5, 0x80, // clock divide
    0xa8, 0x3f, // multiplex 64
    0xd3, 0x00, // display offset 0
    0x40, // start line 0
    0x8d, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xa1, // segment remap
    0xc8, // COM scan descending
    0xda, 0x12, // COM pins alternative
    0x81, 0xcf, // contrast
    0xd9, 0xf1, // precharge
    0xdb, 0x40, // VCOMH deselect
    0xa4, // resume from RAM
    0xa6, // normal, not inverted
    0xaf, // display on
];

// Whole-screen column and page window, sent before every flush
const WINDOW: &[u8] = &[0x21, 0x00, (WIDTH - 1) as u8, 0x22, 0x00, (PAGES - 1) as u8];

/// SSD1306 128x64 OLED on I2C, drawn through an in-memory frame buffer.
///
/// Drawing only touches the buffer; `flush` sends the whole frame.
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    // One byte per column per 8-row page, LSB on top
    buf: [u8; WIDTH * PAGES],
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2cWrite,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buf: [0; WIDTH * PAGES],
        }
    }

    pub fn init(&mut self) -> Result<()> {
        self.command(INIT_SEQUENCE)
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.buf[(y / 8) * WIDTH + x] & (1 << (y % 8)) != 0
    }

    pub fn draw_pixel(&mut self, x: usize, y: usize, state: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let byte = &mut self.buf[(y / 8) * WIDTH + x];
        if state {
            *byte |= 1 << (y % 8);
        } else {
            *byte &= !(1 << (y % 8));
        }
    }

    pub fn i2c(&self) -> &I2C {
        &self.i2c
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, bytes: &[u8]) -> Result<()> {
        for &cmd in bytes {
            self.i2c
                .write(self.address, &[CONTROL_COMMAND, cmd])
                .map_err(|_| Error::Display)?;
        }
        Ok(())
    }

    fn send_frame(&mut self) -> Result<()> {
        self.command(WINDOW)?;
        let mut packet = [0u8; DATA_CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in self.buf.chunks(DATA_CHUNK) {
            packet[1..].copy_from_slice(chunk);
            self.i2c
                .write(self.address, &packet)
                .map_err(|_| Error::Display)?;
        }
        Ok(())
    }
}

impl<I2C> Panel for Ssd1306<I2C>
where
    I2C: I2cWrite,
{
    fn flush(&mut self) -> Result<()> {
        self.send_frame()
    }
}

impl<I2C> DrawTarget for Ssd1306<I2C>
where
    I2C: I2cWrite,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(pos, color) in pixels {
            if pos.x < 0 || pos.y < 0 {
                continue;
            }
            self.draw_pixel(pos.x as usize, pos.y as usize, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        self.buf.fill(if color.is_on() { 0xff } else { 0x00 });
        Ok(())
    }
}

impl<I2C> OriginDimensions for Ssd1306<I2C> {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}
