use log::trace;

use super::frame::{FrameId, FrameTable, AGE_REFERENCED};
use super::{Algorithm, Outcome, Policy, Stats};
use crate::error::{Error, Result};
use crate::trace::Address;

/// AgingPolicy approximates LRU with an 8-bit shift register per frame.
///
/// Every access sets the high bit of the touched frame's counter. Every
/// `refresh_period` accesses all counters are shifted right by one, so a frame
/// referenced in recent intervals keeps a larger value than one referenced long
/// ago. The victim is the frame with the smallest counter, ties going to the
/// lowest frame index.
pub struct AgingPolicy {
    frames: FrameTable,
    refresh_period: u64,
    /// accesses since the last decay, in range [0, refresh_period).
    ticks: u64,
    stats: Stats,
}

impl AgingPolicy {
    pub fn new(capacity: usize, refresh_period: u64) -> Result<Self> {
        if refresh_period == 0 {
            return Err(Error::InvalidWindow { name: "refresh period", value: refresh_period });
        }
        Ok(AgingPolicy {
            frames: FrameTable::new(capacity)?,
            refresh_period,
            ticks: 0,
            stats: Stats::default(),
        })
    }

    fn victim(&self) -> FrameId {
        let mut victim = 0;
        let mut oldest = u8::MAX;
        for (frame_id, frame) in self.frames.occupied() {
            if frame_id == 0 || frame.age < oldest {
                victim = frame_id;
                oldest = frame.age;
            }
        }
        victim
    }

    fn load_or_replace(&mut self, address: Address, is_write: bool) -> Outcome {
        let address = match self.frames.load(address, is_write) {
            Ok(frame_id) => {
                return Outcome::Fault { frame: frame_id, evicted: None, flushed: false }
            }
            Err(address) => address,
        };

        let frame_id = self.victim();
        let evicted = self.frames.replace(frame_id, address, is_write);
        if evicted.dirty {
            self.stats.disk_writes += 1;
        }
        trace!("aging evicted frame {} with age {:#010b}", frame_id, evicted.age);
        Outcome::Fault { frame: frame_id, evicted: evicted.address, flushed: evicted.dirty }
    }

    /// Count one access, shifting every counter right once per refresh period.
    fn tick(&mut self) {
        self.ticks = (self.ticks + 1) % self.refresh_period;
        if self.ticks == 0 {
            for frame in self.frames.occupied_mut() {
                frame.age >>= 1;
            }
        }
    }
}

impl Policy for AgingPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Aging
    }

    fn access(&mut self, address: Address, is_write: bool) -> Result<Outcome> {
        let outcome = match self.frames.find(&address) {
            Some(frame_id) => {
                self.frames.frame_mut(frame_id).dirty |= is_write;
                Outcome::Hit { frame: frame_id }
            }
            None => {
                self.stats.page_faults += 1;
                self.load_or_replace(address, is_write)
            }
        };

        self.frames.frame_mut(outcome.frame()).age |= AGE_REFERENCED;
        self.tick();
        Ok(outcome)
    }

    fn stats(&self) -> Stats {
        self.stats
    }

    fn frames(&self) -> &FrameTable {
        &self.frames
    }
}
