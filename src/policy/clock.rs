use log::trace;

use super::frame::{FrameId, FrameTable};
use super::{Algorithm, Outcome, Policy, Stats};
use crate::error::Result;
use crate::trace::Address;

/// ClockPolicy implements the second-chance replacement policy.
///
/// Frames form a ring with a single hand. When the table is full the hand sweeps
/// forward, clearing reference bits as it goes, and the first unreferenced frame
/// it lands on is the victim. A referenced frame therefore survives one full
/// sweep before it can be evicted.
pub struct ClockPolicy {
    frames: FrameTable,
    hand: FrameId,
    stats: Stats,
}

impl ClockPolicy {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(ClockPolicy { frames: FrameTable::new(capacity)?, hand: 0, stats: Stats::default() })
    }

    fn advance(&mut self) {
        self.hand = (self.hand + 1) % self.frames.capacity();
    }

    /// Sweep the hand to the next unreferenced frame. Terminates within one
    /// revolution plus one step since every visited frame loses its reference bit.
    fn victim(&mut self) -> FrameId {
        self.advance();
        while self.frames.frame(self.hand).referenced {
            self.frames.frame_mut(self.hand).referenced = false;
            self.advance();
        }
        self.hand
    }
}

impl Policy for ClockPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Clock
    }

    fn access(&mut self, address: Address, is_write: bool) -> Result<Outcome> {
        if let Some(frame_id) = self.frames.find(&address) {
            let frame = self.frames.frame_mut(frame_id);
            frame.referenced = true;
            frame.dirty |= is_write;
            return Ok(Outcome::Hit { frame: frame_id });
        }

        self.stats.page_faults += 1;
        let address = match self.frames.load(address, is_write) {
            Ok(frame_id) => {
                return Ok(Outcome::Fault { frame: frame_id, evicted: None, flushed: false })
            }
            Err(address) => address,
        };

        let frame_id = self.victim();
        let evicted = self.frames.replace(frame_id, address, is_write);
        if evicted.dirty {
            self.stats.disk_writes += 1;
        }
        self.advance();
        trace!("clock evicted frame {} hand now at {}", frame_id, self.hand);

        Ok(Outcome::Fault { frame: frame_id, evicted: evicted.address, flushed: evicted.dirty })
    }

    fn stats(&self) -> Stats {
        self.stats
    }

    fn frames(&self) -> &FrameTable {
        &self.frames
    }
}
