//! Commands for the DFPlayer-mini compatible audio module.
//!
//! Frames are the module's 8-byte serial format with the optional checksum
//! left out: `7E FF 06 <cmd> 00 <param hi> <param lo> EF`.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial;

use crate::config::{
    ALERT_TRACK, PLAYER_SETTLE_MS, STARTUP_PROBE_MS, VOLUME_HIGH, VOLUME_LOW,
};
use crate::error::{Error, Result};

const FRAME_START: u8 = 0x7e;
const FRAME_VERSION: u8 = 0xff;
const FRAME_LEN: u8 = 0x06;
const FRAME_NO_ACK: u8 = 0x00;
const FRAME_END: u8 = 0xef;

const CMD_SET_VOLUME: u8 = 0x06;
const CMD_LOOP_ALL: u8 = 0x11;
const CMD_STOP: u8 = 0x16;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum Volume {
    Low,
    High,
}

impl Volume {
    pub fn level(self) -> u8 {
        match self {
            Volume::Low => VOLUME_LOW,
            Volume::High => VOLUME_HIGH,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum PlayerCommand {
    SetVolume(Volume),
    StartLoop,
    Stop,
}

impl PlayerCommand {
    fn code(self) -> u8 {
        match self {
            PlayerCommand::SetVolume(_) => CMD_SET_VOLUME,
            PlayerCommand::StartLoop => CMD_LOOP_ALL,
            PlayerCommand::Stop => CMD_STOP,
        }
    }

    fn param(self) -> u16 {
        match self {
            PlayerCommand::SetVolume(volume) => volume.level().into(),
            PlayerCommand::StartLoop => ALERT_TRACK,
            PlayerCommand::Stop => 0,
        }
    }

    pub fn to_bytes(self) -> [u8; 8] {
        let [hi, lo] = self.param().to_be_bytes();
        [
            FRAME_START,
            FRAME_VERSION,
            FRAME_LEN,
            self.code(),
            FRAME_NO_ACK,
            hi,
            lo,
            FRAME_END,
        ]
    }
}

/// Audio module on a write-only serial line.
///
/// Every command is followed by a blocking settle delay; the module drops
/// commands that arrive too close together.
pub struct DfPlayer<TX, D> {
    tx: TX,
    delay: D,
}

impl<TX, D> DfPlayer<TX, D>
where
    TX: serial::Write<u8>,
    D: DelayMs<u32>,
{
    pub fn new(tx: TX, delay: D) -> Self {
        Self { tx, delay }
    }

    pub fn send(&mut self, cmd: PlayerCommand) -> Result<()> {
        log_debug!("player: sending command {}", cmd.code());
        for b in cmd.to_bytes() {
            nb::block!(self.tx.write(b)).map_err(|_| Error::Audio)?;
        }
        nb::block!(self.tx.flush()).map_err(|_| Error::Audio)?;
        self.delay.delay_ms(PLAYER_SETTLE_MS);
        Ok(())
    }

    pub fn pause(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Plays the alert briefly at low volume so the user hears the module
    /// is alive, then stops it.
    pub fn probe(&mut self) -> Result<()> {
        self.send(PlayerCommand::SetVolume(Volume::Low))?;
        self.send(PlayerCommand::StartLoop)?;
        self.pause(STARTUP_PROBE_MS);
        self.send(PlayerCommand::Stop)
    }

    pub fn tx(&self) -> &TX {
        &self.tx
    }

    pub fn release(self) -> (TX, D) {
        (self.tx, self.delay)
    }
}
