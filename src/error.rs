/// Failures talking to the device's peripherals.
///
/// None of these stop the device: the control loop logs them and keeps polling.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum Error {
    #[error("audio module write failed")]
    Audio,
    #[error("display write failed")]
    Display,
    #[error("glyph missing from font")]
    Font,
}

pub type Result<T> = core::result::Result<T, Error>;
