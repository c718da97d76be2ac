use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial;

use crate::control::{Controller, Event};
use crate::display::{self, Panel, StatusView};
use crate::error::{Error, Result};
use crate::mode::Transition;
use crate::player::DfPlayer;
use crate::switches::{Debouncer, SwitchBank};

/// The whole chime: GPS input, audio module, screen and switches around a
/// [`Controller`].
///
/// Runs as a single polling loop: call [`Kinkon::start`] once, then
/// [`Kinkon::poll`] forever.
pub struct Kinkon<RX, TX, D, P, B> {
    gps: RX,
    player: DfPlayer<TX, D>,
    panel: P,
    switches: B,
    debouncer: Debouncer,
    controller: Controller,
}

impl<RX, TX, D, P, B> Kinkon<RX, TX, D, P, B>
where
    RX: serial::Read<u8>,
    TX: serial::Write<u8>,
    D: DelayMs<u32>,
    P: Panel,
    P::Error: core::fmt::Debug,
    B: SwitchBank,
{
    pub fn new(gps: RX, player: DfPlayer<TX, D>, panel: P, switches: B) -> Self {
        Self {
            gps,
            player,
            panel,
            switches,
            debouncer: Debouncer::new(),
            controller: Controller::new(),
        }
    }

    /// Shows the splash screen, then plays the startup probe.
    pub fn start(&mut self) -> Result<()> {
        display::draw_splash(&mut self.panel)?;
        self.panel.flush()?;
        log_info!("running startup audio probe");
        self.player.probe()
    }

    /// One loop iteration: sample the switches, then handle at most one GPS
    /// byte.
    ///
    /// A failed audio command leaves the mode unchanged so the next reading
    /// asks for it again. The screen is redrawn regardless, and the first
    /// error of the iteration is returned.
    pub fn poll(&mut self) -> Result<()> {
        let switches = self.debouncer.update(self.switches.sample());
        let volume = match self.controller.apply_switches(&switches) {
            Some(transition) => self.execute(transition),
            None => Ok(()),
        };

        let b = match self.gps.read() {
            Ok(b) => b,
            Err(nb::Error::WouldBlock) => return volume,
            Err(nb::Error::Other(_)) => {
                log_warn!("gps serial error, byte skipped");
                return volume;
            }
        };

        let handled = match self.controller.feed(b) {
            Some(Event::Velocity { status, transition }) => {
                let sent = match transition {
                    Some(transition) => self.execute(transition),
                    None => Ok(()),
                };
                let drawn = self.refresh(&status);
                sent.and(drawn)
            }
            Some(Event::Overflow) => {
                log_warn!("response length overflow");
                Ok(())
            }
            _ => Ok(()),
        };
        volume.and(handled)
    }

    fn execute(&mut self, transition: Transition) -> Result<()> {
        if let Err(e) = self.player.send(transition.command()) {
            log_error!("audio command failed, will retry: {}", e);
            return Err(e);
        }
        self.controller.commit(transition);
        Ok(())
    }

    fn refresh(&mut self, status: &StatusView) -> Result<()> {
        display::draw_status(&mut self.panel, status, self.controller.satellites())
            .map_err(|_| Error::Display)?;
        self.panel.flush()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn player(&self) -> &DfPlayer<TX, D> {
        &self.player
    }
}
