//! Replays a recorded receiver session through the whole chime with mocked
//! peripherals.

use core::convert::Infallible;
use std::collections::VecDeque;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use embedded_hal::{blocking::delay::DelayMs, serial};
use kinkon::{
    device::Kinkon,
    display::Panel,
    mode::{Threshold, Unit},
    player::{DfPlayer, PlayerCommand, Volume},
    switches::{SwitchBank, Switches},
};

const SESSION: &[u8] = b"\
$GNTXT,01,01,02,u-blox AG - www.u-blox.com*4E\r\n\
$GPGSV,1,1,03,05,79,310,45,12,45,120,30,25,10,300,*4A\r\n\
$GNGSA,A,3,05,,,,,,,,,,,,2.1,1.2,1.7*2D\r\n\
$GNRMC,101500.00,A,3539.82,N,13945.12,E,5.0,80.1,191026,,,A*6A\r\n\
$GNRMC,101501.00,A,3539.83,N,13945.13,E,20.0,80.3,191026,,,A*5C\r\n\
$GNRMC,101502.00,A,3539.84,N,13945.14,E,20.3,80.2,191026,,,A*5E\r\n\
$GNRMC,101503.00,V,,,,,10.0,,191026,,,N*71\r\n\
$";

struct Gps(VecDeque<u8>);

impl Gps {
    fn new(bytes: &[u8]) -> Self {
        Self(bytes.iter().copied().collect())
    }
}

impl serial::Read<u8> for Gps {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.0.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

#[derive(Default)]
struct Wire(Vec<u8>);

impl serial::Write<u8> for Wire {
    type Error = Infallible;

    fn write(&mut self, b: u8) -> nb::Result<(), Infallible> {
        self.0.push(b);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

impl Wire {
    fn frames(&self) -> Vec<[u8; 8]> {
        self.0
            .chunks(8)
            .map(|c| c.try_into().unwrap())
            .collect()
    }
}

struct Clock;

impl DelayMs<u32> for Clock {
    fn delay_ms(&mut self, _ms: u32) {}
}

struct Screen {
    lit: Vec<[bool; 128]>,
    flushes: usize,
}

impl Screen {
    fn new() -> Self {
        Self {
            lit: vec![[false; 128]; 64],
            flushes: 0,
        }
    }
}

impl OriginDimensions for Screen {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }
}

impl DrawTarget for Screen {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if (0..128).contains(&p.x) && (0..64).contains(&p.y) {
                self.lit[p.y as usize][p.x as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Panel for Screen {
    fn flush(&mut self) -> kinkon::error::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

struct Held(Switches);

impl SwitchBank for Held {
    fn sample(&mut self) -> Switches {
        self.0
    }
}

type Chime = Kinkon<Gps, Wire, Clock, Screen, Held>;

fn replay(switches: Switches) -> Chime {
    let mut chime = Kinkon::new(
        Gps::new(SESSION),
        DfPlayer::new(Wire::default(), Clock),
        Screen::new(),
        Held(switches),
    );
    chime.start().unwrap();
    for _ in 0..SESSION.len() + 8 {
        chime.poll().unwrap();
    }
    chime
}

#[test]
fn session_at_35_kmh_starts_and_stops_the_alert() {
    let chime = replay(Switches {
        select_35: true,
        ..Default::default()
    });

    assert_eq!(
        chime.player().tx().frames(),
        vec![
            // startup probe
            PlayerCommand::SetVolume(Volume::Low).to_bytes(),
            PlayerCommand::StartLoop.to_bytes(),
            PlayerCommand::Stop.to_bytes(),
            // 35 km/h selector settles
            PlayerCommand::SetVolume(Volume::High).to_bytes(),
            // 9.3 km/h, then 37.0, 37.6, 18.5
            PlayerCommand::Stop.to_bytes(),
            PlayerCommand::StartLoop.to_bytes(),
            PlayerCommand::Stop.to_bytes(),
        ]
    );

    let mode = chime.controller().mode();
    assert_eq!(mode.threshold(), Threshold::Kmh35);
    assert_eq!(mode.unit(), Unit::Kmh);
    assert!(!mode.is_playing());

    // Splash plus one refresh per velocity sentence.
    assert_eq!(chime.panel().flushes, 5);
}

#[test]
fn satellite_bars_reflect_the_session() {
    let chime = replay(Switches::default());

    let sats = chime.controller().satellites();
    assert_eq!(sats.len(), 3);
    assert_eq!(sats.locked_count(), 1);
    assert!(sats.get(5).unwrap().locked);
    assert_eq!(sats.get(25).unwrap().snr, 0.0);

    // Satellite 5: locked, 45 dB, filled bar 24 px tall.
    let lit = &chime.panel().lit;
    assert!(lit[41][1]);
    assert!(lit[63][2]);
    assert!(!lit[38][1]);
    // Satellite 12: 30 dB, outlined bar 16 px tall.
    assert!(lit[55][5]);
    assert!(!lit[55][6]);
    assert!(lit[55][8]);
    // Satellite 25 has no signal and no bar.
    assert!(!lit[60][11]);
}

#[test]
fn mile_switch_changes_display_but_not_decisions() {
    let kmh = replay(Switches {
        select_35: true,
        ..Default::default()
    });
    let mile = replay(Switches {
        select_35: true,
        mile: true,
        ..Default::default()
    });

    assert_eq!(mile.controller().mode().unit(), Unit::Mile);
    assert_eq!(mile.player().tx().frames(), kmh.player().tx().frames());
    assert_ne!(mile.panel().lit, kmh.panel().lit);
}

#[test]
fn default_threshold_keeps_playing_through_the_session() {
    let chime = replay(Switches::default());

    // Every reading is at or over 3 km/h and startup state is playing, so
    // only the probe reaches the module.
    assert_eq!(
        chime.player().tx().frames(),
        vec![
            PlayerCommand::SetVolume(Volume::Low).to_bytes(),
            PlayerCommand::StartLoop.to_bytes(),
            PlayerCommand::Stop.to_bytes(),
        ]
    );
    assert!(chime.controller().mode().is_playing());
}
