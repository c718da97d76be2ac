//! Build-time settings. The device has no runtime configuration other than
//! its four switch inputs.

pub const NAME: &str = "KINKON";
pub const VERSION: &str = concat!("V.", env!("CARGO_PKG_VERSION_MAJOR"), ".", env!("CARGO_PKG_VERSION_MINOR"));
pub const COPYRIGHT: &str = "(C)2025";
pub const COMPANY_NAME: &str = "SopranoVision";

/// Baud rate shared by the GPS receiver and the audio module.
pub const UART_BAUD: u32 = 9600;

/// Sentence buffer capacity, start marker included.
pub const FRAME_CAPACITY: usize = 256;
/// NMEA start-of-sentence marker.
pub const SENTENCE_MARKER: u8 = b'$';

/// Satellites the tracking table can hold at once.
pub const SATELLITE_CAPACITY: usize = 64;
/// Consecutive missed inventory updates before a satellite is dropped.
pub const SATELLITE_EVICT_MISSES: u8 = 10;

pub const KMH_PER_KNOT: f32 = 1.852;
pub const MILES_PER_KM: f32 = 0.621371;

/// Pause after every command written to the audio module.
pub const PLAYER_SETTLE_MS: u32 = 100;
/// How long the startup probe lets the alert play.
pub const STARTUP_PROBE_MS: u32 = 2500;
/// Audio module volume levels (0..=30).
pub const VOLUME_LOW: u8 = 5;
pub const VOLUME_HIGH: u8 = 30;
/// Track played in a loop while over the threshold.
pub const ALERT_TRACK: u16 = 1;

/// Identical consecutive samples before a switch change is accepted.
pub const DEBOUNCE_SAMPLES: u8 = 3;

pub const DISPLAY_I2C_ADDR: u8 = 0x3c;
pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

/// SNR that fills a satellite bar completely.
pub const SNR_FULL_SCALE: f32 = 60.0;
/// Top and bottom rows of the satellite bar band, inclusive.
pub const BAR_AREA_TOP: i32 = 32;
pub const BAR_AREA_BOTTOM: i32 = 63;
pub const BAR_WIDTH: u32 = 4;
pub const BAR_PITCH: i32 = 5;
/// Guide lines drawn at 60 dB and 30 dB.
pub const MAX_SNR_LINE_Y: i32 = 31;
pub const FIX_SNR_LINE_Y: i32 = 47;
