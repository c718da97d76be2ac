#![cfg_attr(not(test), no_std)]

//! KINKON: a speed chime that plays an alert loop while GPS ground speed is
//! at or above a switch-selected threshold.
//!
//! The decision core (framing, NMEA parsing, satellite tracking, threshold
//! state) is plain Rust and runs on the host. Hardware sits behind
//! `embedded-hal` and `embedded-graphics` traits; the STM32L4 firmware lives in
//! `src/bin.rs` behind the `stm32l4` feature.

use core::fmt::{self, Write};

#[cfg(feature = "stm32l4")]
use defmt_brtt as _; // global logger

#[cfg(feature = "stm32l4")]
use panic_probe as _;

use tinyvec::ArrayVec;

#[macro_use]
pub mod log;

pub mod config;
pub mod control;
pub mod device;
pub mod display;
pub mod error;
pub mod framer;
pub mod mode;
pub mod nmea;
pub mod oled;
pub mod player;
pub mod satellites;
pub mod switches;

pub use error::Error;

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[cfg(feature = "stm32l4")]
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

#[cfg(feature = "stm32l4")]
static COUNT: core::sync::atomic::AtomicUsize = core::sync::atomic::AtomicUsize::new(0);
#[cfg(feature = "stm32l4")]
defmt::timestamp!("{=usize}", {
    use core::sync::atomic::Ordering;
    // NOTE(no-CAS) `timestamps` runs with interrupts disabled
    let n = COUNT.load(Ordering::Relaxed);
    COUNT.store(n + 1, Ordering::Relaxed);
    n
});

/// Fixed-capacity text buffer for formatting screen labels without an allocator.
///
/// Text past the capacity is silently cut off.
pub struct FmtBuf<const N: usize = 32>(pub ArrayVec<[u8; N]>);

impl<const N: usize> Write for FmtBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if self.0.try_push(b).is_some() {
                break;
            }
        }
        Ok(())
    }
}

impl<const N: usize> FmtBuf<N> {
    pub fn new() -> Self {
        Self(Default::default())
    }

    /// Everything written so far, or the longest valid UTF-8 prefix if a
    /// multi-byte character was cut off at the capacity limit.
    pub fn as_str(&self) -> &str {
        let bytes = self.0.as_slice();
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

impl<const N: usize> Default for FmtBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}
