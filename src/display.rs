use core::fmt::Write as _;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_6X10, FONT_9X15},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use u8g2_fonts::{
    fonts,
    types::{FontColor, HorizontalAlignment, VerticalPosition},
    FontRenderer,
};

use crate::config::{
    BAR_AREA_BOTTOM, BAR_AREA_TOP, BAR_PITCH, BAR_WIDTH, COMPANY_NAME, COPYRIGHT, DISPLAY_WIDTH,
    FIX_SNR_LINE_Y, MAX_SNR_LINE_Y, NAME, SNR_FULL_SCALE, VERSION,
};
use crate::error::{Error, Result};
use crate::mode::{Threshold, Unit};
use crate::satellites::{SatelliteInfo, SatelliteTable};
use crate::FmtBuf;

/// A monochrome screen that buffers drawing until flushed.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    fn flush(&mut self) -> Result<()>;
}

/// What the status screen shows after a velocity sentence.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StatusView {
    /// Ground speed already converted to `unit`.
    pub speed: f32,
    pub unit: Unit,
    pub fix_active: bool,
    pub threshold: Threshold,
}

impl StatusView {
    /// `"42.0 km/h"`
    pub fn headline(&self) -> FmtBuf<24> {
        let mut buf = FmtBuf::new();
        // FmtBuf cuts text off at capacity instead of failing.
        write!(buf, "{:.1} {}", self.speed, self.unit.label()).ok();
        buf
    }

    /// `"FIXED MODE:35"` or `"WAIT... MODE:35"`
    pub fn message(&self) -> FmtBuf<24> {
        let mut buf = FmtBuf::new();
        write!(
            buf,
            "{} MODE:{}",
            if self.fix_active { "FIXED" } else { "WAIT..." },
            self.threshold.kmh() as u32
        )
        .ok();
        buf
    }
}

/// Bar for one satellite, or `None` when there is no signal to show.
pub fn satellite_bar(index: usize, info: &SatelliteInfo) -> Option<Rectangle> {
    let x = index as i32 * BAR_PITCH;
    if x + BAR_WIDTH as i32 > DISPLAY_WIDTH as i32 {
        return None;
    }
    let band = BAR_AREA_BOTTOM - BAR_AREA_TOP + 1;
    let height = ((info.snr / SNR_FULL_SCALE) * band as f32) as i32;
    let height = height.clamp(0, band);
    if height == 0 {
        return None;
    }
    Some(Rectangle::new(
        Point::new(x, BAR_AREA_BOTTOM - height + 1),
        Size::new(BAR_WIDTH, height as u32),
    ))
}

pub fn draw_status<D>(
    display: &mut D,
    view: &StatusView,
    satellites: &SatelliteTable,
) -> core::result::Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    display.clear(BinaryColor::Off)?;

    Text::with_baseline(
        view.headline().as_str(),
        Point::zero(),
        MonoTextStyle::new(&FONT_9X15, BinaryColor::On),
        Baseline::Top,
    )
    .draw(display)?;
    Text::with_baseline(
        view.message().as_str(),
        Point::new(0, 16),
        MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        Baseline::Top,
    )
    .draw(display)?;

    let guide = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let right = DISPLAY_WIDTH as i32 - 1;
    for y in [MAX_SNR_LINE_Y, FIX_SNR_LINE_Y] {
        Line::new(Point::new(0, y), Point::new(right, y))
            .into_styled(guide)
            .draw(display)?;
    }

    let filled = PrimitiveStyle::with_fill(BinaryColor::On);
    for (index, sat) in satellites.iter().enumerate() {
        if index as i32 * BAR_PITCH + BAR_WIDTH as i32 > DISPLAY_WIDTH as i32 {
            break;
        }
        let Some(bar) = satellite_bar(index, &sat.info) else {
            continue;
        };
        let style = if sat.info.locked { filled } else { guide };
        bar.into_styled(style).draw(display)?;
    }

    Ok(())
}

pub fn draw_splash<D>(display: &mut D) -> Result<()>
where
    D: DrawTarget<Color = BinaryColor>,
    D::Error: core::fmt::Debug,
{
    display.clear(BinaryColor::Off).map_err(|_| Error::Display)?;

    FontRenderer::new::<fonts::u8g2_font_logisoso16_tr>()
        .render_aligned(
            NAME,
            Point::zero(),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(BinaryColor::On),
            display,
        )
        .map_err(|e| match e {
            u8g2_fonts::Error::DisplayError(_) => Error::Display,
            _ => Error::Font,
        })?;

    let big = MonoTextStyle::new(&FONT_9X15, BinaryColor::On);
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    for (text, y, style) in [
        (VERSION, 18, big),
        (COPYRIGHT, 36, small),
        (COMPANY_NAME, 46, small),
    ] {
        Text::with_baseline(text, Point::new(0, y), style, Baseline::Top)
            .draw(display)
            .map_err(|_| Error::Display)?;
    }
    Ok(())
}
