use embedded_hal::digital::v2::InputPin;

use crate::config::DEBOUNCE_SAMPLES;

/// Which switch inputs are asserted (pulled to ground).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub struct Switches {
    pub select_35: bool,
    pub select_85: bool,
    pub select_105: bool,
    pub mile: bool,
}

pub trait SwitchBank {
    /// Reads all inputs once, without debouncing.
    fn sample(&mut self) -> Switches;
}

/// Four active-low inputs with pull-ups.
pub struct PinBank<P35, P85, P105, PM> {
    pub pin_35: P35,
    pub pin_85: P85,
    pub pin_105: P105,
    pub pin_mile: PM,
}

// A pin that can't be read counts as released.
fn asserted<P: InputPin>(pin: &P) -> bool {
    pin.is_low().unwrap_or(false)
}

impl<P35, P85, P105, PM> SwitchBank for PinBank<P35, P85, P105, PM>
where
    P35: InputPin,
    P85: InputPin,
    P105: InputPin,
    PM: InputPin,
{
    fn sample(&mut self) -> Switches {
        Switches {
            select_35: asserted(&self.pin_35),
            select_85: asserted(&self.pin_85),
            select_105: asserted(&self.pin_105),
            mile: asserted(&self.pin_mile),
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
struct Debounce {
    stable: bool,
    streak: u8,
}

impl Debounce {
    fn update(&mut self, raw: bool) -> bool {
        if raw == self.stable {
            self.streak = 0;
        } else {
            self.streak += 1;
            if self.streak >= DEBOUNCE_SAMPLES {
                self.stable = raw;
                self.streak = 0;
            }
        }
        self.stable
    }
}

/// Accepts a change on an input only after it reads the same value for
/// `DEBOUNCE_SAMPLES` consecutive samples. Each input is tracked on its own.
/// Everything starts released.
#[derive(Debug, Default, Clone)]
pub struct Debouncer {
    select_35: Debounce,
    select_85: Debounce,
    select_105: Debounce,
    mile: Debounce,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, raw: Switches) -> Switches {
        Switches {
            select_35: self.select_35.update(raw.select_35),
            select_85: self.select_85.update(raw.select_85),
            select_105: self.select_105.update(raw.select_105),
            mile: self.mile.update(raw.mile),
        }
    }
}
