use tinyvec::ArrayVec;

use crate::config::{SATELLITE_CAPACITY, SATELLITE_EVICT_MISSES};
use crate::nmea::{Gsa, Gsv};

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SatelliteInfo {
    /// Listed in the latest GSA, i.e. used for the fix.
    pub locked: bool,
    /// Latest reported signal-to-noise ratio, dB.
    pub snr: f32,
    /// Consecutive GSV updates this satellite was missing from.
    pub miss_count: u8,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Satellite {
    pub id: u16,
    pub info: SatelliteInfo,
}

/// Satellites currently in view, ordered by ID.
#[derive(Debug, Default, Clone)]
pub struct SatelliteTable {
    entries: ArrayVec<[Satellite; SATELLITE_CAPACITY]>,
}

impl SatelliteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u16) -> Option<&SatelliteInfo> {
        self.position(id).ok().map(|i| &self.entries[i].info)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Satellite> + '_ {
        self.entries.iter()
    }

    pub fn locked_count(&self) -> usize {
        self.entries.iter().filter(|s| s.info.locked).count()
    }

    /// Applies one satellites-in-view sentence as an inventory pass.
    ///
    /// Every tracked satellite ages by one miss, listed ones are refreshed
    /// back to zero, and anything that reached the eviction count is dropped
    /// once the pass is complete.
    pub fn apply_inventory(&mut self, gsv: &Gsv) {
        for sat in self.entries.iter_mut() {
            sat.info.miss_count = sat.info.miss_count.saturating_add(1);
        }

        for view in &gsv.views {
            if let Some(info) = self.entry(view.id) {
                info.snr = view.snr;
                info.miss_count = 0;
            }
        }

        let before = self.entries.len();
        self.entries
            .retain(|sat| sat.info.miss_count < SATELLITE_EVICT_MISSES);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            log_debug!("evicted {} stale satellites", evicted as u32);
        }
    }

    /// Applies one active-satellites sentence: only the listed IDs stay locked.
    pub fn apply_locks(&mut self, gsa: &Gsa) {
        for sat in self.entries.iter_mut() {
            sat.info.locked = false;
        }

        for &id in &gsa.locked {
            if let Some(info) = self.entry(id) {
                info.locked = true;
            }
        }
    }

    fn position(&self, id: u16) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |sat| sat.id)
    }

    // Finds or inserts the entry for `id`. Returns None when a new entry
    // would not fit.
    fn entry(&mut self, id: u16) -> Option<&mut SatelliteInfo> {
        let index = match self.position(id) {
            Ok(index) => index,
            Err(index) => {
                if self.entries.len() == self.entries.capacity() {
                    log_warn!("satellite table full, dropping {}", id);
                    return None;
                }
                self.entries.insert(
                    index,
                    Satellite {
                        id,
                        info: SatelliteInfo::default(),
                    },
                );
                index
            }
        };
        Some(&mut self.entries[index].info)
    }
}
