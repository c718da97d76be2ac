use tinyvec::ArrayVec;

use crate::config::{FRAME_CAPACITY, SENTENCE_MARKER};

pub type SentenceBuf = ArrayVec<[u8; FRAME_CAPACITY]>;

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "stm32l4", derive(defmt::Format))]
pub enum FrameError {
    #[error("sentence longer than {0} bytes")]
    Overflow(usize),
}

/// Splits a byte stream into `$`-delimited sentences.
///
/// A sentence is only known to be complete when the *next* marker arrives, so
/// each one is emitted one marker late.
pub struct Framer {
    buf: SentenceBuf,
    // Set once a marker has been seen; cleared by an overflow until the next one.
    synced: bool,
}

impl Framer {
    pub fn new() -> Self {
        Self {
            buf: SentenceBuf::new(),
            synced: false,
        }
    }

    /// Feeds one byte. Returns the previous sentence when `b` is a marker, or
    /// an overflow error when the buffer ran out before one arrived.
    pub fn process_byte(&mut self, b: u8) -> Option<Result<SentenceBuf, FrameError>> {
        if b == SENTENCE_MARKER {
            let done = core::mem::take(&mut self.buf);
            self.buf.push(b);
            let was_synced = core::mem::replace(&mut self.synced, true);
            return if was_synced && !done.is_empty() {
                Some(Ok(done))
            } else {
                None
            };
        }

        if !self.synced {
            return None;
        }

        if self.buf.try_push(b).is_some() {
            self.buf.clear();
            self.synced = false;
            return Some(Err(FrameError::Overflow(FRAME_CAPACITY)));
        }
        None
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}
