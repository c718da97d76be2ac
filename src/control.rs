//! The chime's decision core: bytes and switch readings in, playback
//! commands and screen refreshes out. Owns all mutable state; performs no I/O.

use crate::display::StatusView;
use crate::framer::{FrameError, Framer};
use crate::mode::{ModeState, Transition};
use crate::nmea::{Rmc, Sentence};
use crate::satellites::SatelliteTable;
use crate::switches::Switches;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    /// A sentence outgrew the frame buffer and was dropped.
    Overflow,
    /// Satellites-in-view sentence applied to the table.
    Satellites,
    /// Active-satellites sentence applied to the table.
    Locks,
    /// Well-formed but not a sentence the chime uses.
    Ignored,
    /// Velocity sentence: the screen needs a refresh, and playback may need
    /// to start or stop.
    Velocity {
        status: StatusView,
        transition: Option<Transition>,
    },
}

#[derive(Default)]
pub struct Controller {
    framer: Framer,
    satellites: SatelliteTable,
    mode: ModeState,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn satellites(&self) -> &SatelliteTable {
        &self.satellites
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    /// Applies debounced switch states. The unit applies at once; a threshold
    /// change is returned and only takes effect through [`Controller::commit`].
    pub fn apply_switches(&mut self, switches: &Switches) -> Option<Transition> {
        self.mode.select_unit(switches);
        self.mode.threshold_change(switches)
    }

    /// Records that the module accepted the command for `transition`.
    pub fn commit(&mut self, transition: Transition) {
        self.mode.commit(transition);
    }

    /// Feeds one serial byte. Produces an event whenever a sentence completes
    /// or the framer overflows.
    pub fn feed(&mut self, b: u8) -> Option<Event> {
        match self.framer.process_byte(b)? {
            Ok(sentence) => Some(self.handle_sentence(&sentence)),
            Err(FrameError::Overflow(len)) => {
                log_warn!("sentence over {} bytes dropped", len as u32);
                Some(Event::Overflow)
            }
        }
    }

    pub fn handle_sentence(&mut self, raw: &[u8]) -> Event {
        match Sentence::parse(raw) {
            Sentence::Rmc { talker, rmc } => {
                log_trace!("{}{}RMC", talker[0] as char, talker[1] as char);
                self.on_velocity(rmc)
            }
            Sentence::Gsv(gsv) => {
                log_trace!(
                    "{}{}GSV: {} in view",
                    gsv.talker[0] as char,
                    gsv.talker[1] as char,
                    gsv.views.len() as u32
                );
                self.satellites.apply_inventory(&gsv);
                Event::Satellites
            }
            Sentence::Gsa(gsa) => {
                log_trace!(
                    "{}{}GSA: {} locked",
                    gsa.talker[0] as char,
                    gsa.talker[1] as char,
                    gsa.locked.len() as u32
                );
                self.satellites.apply_locks(&gsa);
                Event::Locks
            }
            Sentence::Other => Event::Ignored,
        }
    }

    // Play/stop follows the raw speed even when the fix is not active. A
    // sentence without a speed still refreshes the screen, showing zero.
    fn on_velocity(&mut self, rmc: Rmc) -> Event {
        let transition = rmc.speed_kmh.and_then(|kmh| self.mode.speed_change(kmh));
        let kmh = rmc.speed_kmh.unwrap_or(0.0);
        let unit = self.mode.unit();
        Event::Velocity {
            status: StatusView {
                speed: unit.from_kmh(kmh),
                unit,
                fix_active: rmc.active,
                threshold: self.mode.threshold(),
            },
            transition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FRAME_CAPACITY;
    use crate::mode::{Threshold, Unit};

    fn feed_all(controller: &mut Controller, input: &[u8]) -> Vec<Event> {
        input.iter().filter_map(|&b| controller.feed(b)).collect()
    }

    fn velocity(event: Event) -> (StatusView, Option<Transition>) {
        let Event::Velocity { status, transition } = event else {
            panic!("expected velocity");
        };
        (status, transition)
    }

    // 18.9 knots is just over 35 km/h; 18.8 knots just under.
    const FAST_FIX: &[u8] = b"$GNRMC,083559.00,A,4717.11437,N,00833.91522,E,18.9,77.52,091202,,,A*57\r\n";
    const SLOW_NOFIX: &[u8] = b"$GNRMC,083600.00,V,,,,,18.8,,091202,,,N*7F\r\n";

    fn switch_35() -> Switches {
        Switches {
            select_35: true,
            ..Default::default()
        }
    }

    #[test]
    fn velocity_sentence_requests_refresh_and_playback() {
        let mut controller = Controller::new();
        let change = controller.apply_switches(&switch_35());
        assert_eq!(change, Some(Transition::Threshold(Threshold::Kmh35)));
        controller.commit(change.unwrap());

        // Playing from startup; slow reading stops it.
        let (status, transition) = velocity(controller.handle_sentence(SLOW_NOFIX));
        assert_eq!(transition, Some(Transition::Playing(false)));
        assert!(!status.fix_active);
        assert_eq!(status.threshold, Threshold::Kmh35);
        assert!((status.speed - 18.8 * 1.852).abs() < 1e-3);
        controller.commit(transition.unwrap());

        let (status, transition) = velocity(controller.handle_sentence(FAST_FIX));
        assert_eq!(transition, Some(Transition::Playing(true)));
        assert!(status.fix_active);
        controller.commit(transition.unwrap());
        assert!(controller.mode().is_playing());
    }

    #[test]
    fn uncommitted_stop_is_requested_again() {
        let mut controller = Controller::new();
        controller.commit(Transition::Threshold(Threshold::Kmh35));

        let mut input = SLOW_NOFIX.to_vec();
        input.extend_from_slice(SLOW_NOFIX);
        input.push(b'$');
        let events = feed_all(&mut controller, &input);

        assert_eq!(events.len(), 2);
        for event in events {
            assert_eq!(velocity(event).1, Some(Transition::Playing(false)));
        }
        assert!(controller.mode().is_playing());
    }

    #[test]
    fn uncommitted_threshold_is_requested_again() {
        let mut controller = Controller::new();
        assert!(controller.apply_switches(&switch_35()).is_some());
        assert!(controller.apply_switches(&switch_35()).is_some());
        assert_eq!(controller.mode().threshold(), Threshold::Kmh3);
    }

    #[test]
    fn velocity_without_speed_refreshes_but_keeps_playing() {
        let mut controller = Controller::new();
        let event = controller.handle_sentence(b"$GNRMC,,V,,,,,,,,,,N*53\r\n");
        assert_eq!(
            event,
            Event::Velocity {
                status: StatusView {
                    speed: 0.0,
                    unit: Unit::Kmh,
                    fix_active: false,
                    threshold: Threshold::Kmh3,
                },
                transition: None,
            }
        );
        assert!(controller.mode().is_playing());
    }

    #[test]
    fn satellite_sentences_update_table_without_refresh() {
        let mut controller = Controller::new();
        let events = feed_all(
            &mut controller,
            b"$GPGSV,1,1,02,05,79,310,40,07,11,045,22*7E\r\n$GNGSA,A,3,05,,,,,,,,,,,,1.8,1.0,1.5*30\r\n$",
        );

        assert_eq!(events, vec![Event::Satellites, Event::Locks]);
        let sats = controller.satellites();
        assert_eq!(sats.len(), 2);
        assert!(sats.get(5).unwrap().locked);
        assert_eq!(sats.get(5).unwrap().snr, 40.0);
        assert!(!sats.get(7).unwrap().locked);
    }

    #[test]
    fn unknown_sentence_is_ignored() {
        let mut controller = Controller::new();
        let events = feed_all(&mut controller, b"$GNGGA,083559.00,4717.11437,N*00\r\n$");
        assert_eq!(events, vec![Event::Ignored]);
    }

    #[test]
    fn overflow_is_reported_and_stream_recovers() {
        let mut controller = Controller::new();
        let mut input = b"$GNTXT,".to_vec();
        input.extend(core::iter::repeat(b'x').take(FRAME_CAPACITY));
        input.extend_from_slice(b"$GPGSV,1,1,01,05,79,310,40*7E\r\n$");

        let events = feed_all(&mut controller, &input);
        assert_eq!(events, vec![Event::Overflow, Event::Satellites]);
        assert!(controller.satellites().get(5).is_some());
    }

    #[test]
    fn mile_unit_converts_display_only() {
        let mut controller = Controller::new();
        let change = controller.apply_switches(&Switches {
            select_35: true,
            mile: true,
            ..Default::default()
        });
        controller.commit(change.unwrap());

        let (status, transition) = velocity(controller.handle_sentence(FAST_FIX));
        // Startup state is playing and 35.0 km/h is exceeded: nothing to send.
        assert_eq!(transition, None);
        assert_eq!(status.unit, Unit::Mile);
        assert!((status.speed - 18.9 * 1.852 * 0.621371).abs() < 1e-3);
        assert!(controller.mode().is_playing());
    }

    #[test]
    fn threshold_switch_applies_before_next_reading() {
        let mut controller = Controller::new();
        assert_eq!(velocity(controller.handle_sentence(FAST_FIX)).1, None);
        assert!(controller.mode().is_playing());

        let change = controller.apply_switches(&Switches {
            select_85: true,
            ..Default::default()
        });
        controller.commit(change.unwrap());
        assert_eq!(
            velocity(controller.handle_sentence(FAST_FIX)).1,
            Some(Transition::Playing(false))
        );
    }
}
