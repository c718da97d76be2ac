use crate::config::MILES_PER_KM;
use crate::player::{PlayerCommand, Volume};
use crate::switches::Switches;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum Threshold {
    Kmh3,
    Kmh35,
    Kmh85,
    Kmh105,
}

impl Threshold {
    pub fn kmh(self) -> f32 {
        match self {
            Threshold::Kmh3 => 3.0,
            Threshold::Kmh35 => 35.0,
            Threshold::Kmh85 => 85.0,
            Threshold::Kmh105 => 105.0,
        }
    }

    /// Faster thresholds are for road driving, so the alert gets louder.
    pub fn volume(self) -> Volume {
        match self {
            Threshold::Kmh3 => Volume::Low,
            Threshold::Kmh35 | Threshold::Kmh85 | Threshold::Kmh105 => Volume::High,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum Selector {
    Select35,
    Select85,
    Select105,
}

impl Selector {
    fn asserted(self, switches: &Switches) -> bool {
        match self {
            Selector::Select35 => switches.select_35,
            Selector::Select85 => switches.select_85,
            Selector::Select105 => switches.select_105,
        }
    }
}

/// Threshold selectors in priority order; the first asserted one wins.
pub const THRESHOLD_PRIORITY: [(Selector, Threshold); 3] = [
    (Selector::Select35, Threshold::Kmh35),
    (Selector::Select85, Threshold::Kmh85),
    (Selector::Select105, Threshold::Kmh105),
];

/// Threshold used when no selector is asserted.
pub const DEFAULT_THRESHOLD: Threshold = Threshold::Kmh3;

pub fn selected_threshold(switches: &Switches) -> Threshold {
    THRESHOLD_PRIORITY
        .iter()
        .find(|(selector, _)| selector.asserted(switches))
        .map(|&(_, threshold)| threshold)
        .unwrap_or(DEFAULT_THRESHOLD)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum Unit {
    Kmh,
    Mile,
}

impl Unit {
    pub fn label(self) -> &'static str {
        match self {
            Unit::Kmh => "km/h",
            Unit::Mile => "mile",
        }
    }

    pub fn from_kmh(self, kmh: f32) -> f32 {
        match self {
            Unit::Kmh => kmh,
            Unit::Mile => kmh * MILES_PER_KM,
        }
    }
}

/// A state change that needs the audio module to agree before it takes
/// effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum Transition {
    Threshold(Threshold),
    Playing(bool),
}

impl Transition {
    /// What to send to the module for this change.
    pub fn command(self) -> PlayerCommand {
        match self {
            Transition::Threshold(threshold) => PlayerCommand::SetVolume(threshold.volume()),
            Transition::Playing(true) => PlayerCommand::StartLoop,
            Transition::Playing(false) => PlayerCommand::Stop,
        }
    }
}

/// Selected threshold, display unit, and whether the alert is playing.
///
/// Threshold comparisons are always made in km/h; the unit only affects what
/// is shown. Threshold and playing only change through [`ModeState::commit`],
/// once the matching command reached the module, so a failed send is retried
/// on the next reading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModeState {
    threshold: Threshold,
    unit: Unit,
    playing: bool,
}

impl Default for ModeState {
    // `playing` starts set: the startup probe leaves the module stopped, and
    // this makes the first slow reading send an explicit stop.
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            unit: Unit::Kmh,
            playing: true,
        }
    }
}

impl ModeState {
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The threshold change the selectors ask for, if any.
    pub fn threshold_change(&self, switches: &Switches) -> Option<Transition> {
        let threshold = selected_threshold(switches);
        (threshold != self.threshold).then_some(Transition::Threshold(threshold))
    }

    /// Start at or above the threshold, stop below it.
    pub fn speed_change(&self, kmh: f32) -> Option<Transition> {
        let over = kmh >= self.threshold.kmh();
        (over != self.playing).then_some(Transition::Playing(over))
    }

    pub fn commit(&mut self, transition: Transition) {
        match transition {
            Transition::Threshold(threshold) => {
                log_info!("threshold changed to {}", threshold.kmh());
                self.threshold = threshold;
            }
            Transition::Playing(playing) => {
                log_info!("alert {}", if playing { "playing" } else { "stopped" });
                self.playing = playing;
            }
        }
    }

    /// Follows the unit switch. Returns whether the unit changed. Needs no
    /// module command, so it applies at once.
    pub fn select_unit(&mut self, switches: &Switches) -> bool {
        let unit = if switches.mile { Unit::Mile } else { Unit::Kmh };
        if unit == self.unit {
            return false;
        }
        log_info!("unit changed to {}", unit.label());
        self.unit = unit;
        true
    }
}
