use log::trace;

use super::frame::{FrameId, FrameTable};
use super::{Algorithm, Outcome, Policy, Stats};
use crate::error::{Error, Result};
use crate::trace::Address;

/// WorkingSetClockPolicy implements the WSClock replacement policy.
///
/// Like [`super::clock::ClockPolicy`] it sweeps a ring of frames clearing
/// reference bits, but it also tracks the virtual time of each frame's last
/// access. When the table is full the sweep starts at the oldest resident frame
/// and:
///
/// - takes the first unreferenced clean frame as the victim;
/// - schedules a write-back for an unreferenced dirty frame that has left the
///   working set (`virtual_time - last_used >= tau`), so it is clean when the
///   sweep comes around again;
/// - gives referenced frames a second chance by clearing their bit.
///
/// The sweep covers at most two revolutions, after which frames written back
/// during the sweep are examined once more. If nothing qualifies, the frame the
/// sweep started from is evicted unconditionally. Independently of faults,
/// all reference bits are cleared once per `refresh_period` accesses.
pub struct WorkingSetClockPolicy {
    frames: FrameTable,
    refresh_period: u64,
    /// accesses since the last reference bit reset, in range [0, refresh_period).
    ticks: u64,
    /// logical clock, incremented once per access.
    virtual_time: u64,
    /// working set window.
    tau: u64,
    /// where the next sweep starts, the resident frame with the smallest
    /// last-used time as of the last eviction.
    oldest: FrameId,
    stats: Stats,
}

impl WorkingSetClockPolicy {
    pub fn new(capacity: usize, refresh_period: u64, tau: u64) -> Result<Self> {
        if refresh_period == 0 {
            return Err(Error::InvalidWindow { name: "refresh period", value: refresh_period });
        }
        if tau == 0 {
            return Err(Error::InvalidWindow { name: "tau", value: tau });
        }
        Ok(WorkingSetClockPolicy {
            frames: FrameTable::new(capacity)?,
            refresh_period,
            ticks: 0,
            virtual_time: 0,
            tau,
            oldest: 0,
            stats: Stats::default(),
        })
    }

    fn victim(&mut self) -> FrameId {
        let capacity = self.frames.capacity();
        let now = self.virtual_time;
        let mut hand = self.oldest;
        for _ in 0..2 * capacity {
            let frame = self.frames.frame_mut(hand);
            if frame.referenced {
                frame.referenced = false;
            } else if !frame.dirty {
                return hand;
            } else if now.saturating_sub(frame.last_used) >= self.tau {
                frame.dirty = false;
                self.stats.disk_writes += 1;
                trace!("wsclock scheduled write back of frame {}", hand);
            }
            hand = (hand + 1) % capacity;
        }
        // reference bits are all clear by now, so a clean frame here is one that
        // was written back during the second revolution.
        for _ in 0..capacity {
            if !self.frames.frame(hand).dirty {
                return hand;
            }
            hand = (hand + 1) % capacity;
        }
        trace!("wsclock found no candidate, falling back to frame {}", self.oldest);
        self.oldest
    }

    fn replace(&mut self, address: Address, is_write: bool) -> Outcome {
        let frame_id = self.victim();
        let evicted = self.frames.replace(frame_id, address, is_write);
        if evicted.dirty {
            self.stats.disk_writes += 1;
        }
        self.frames.frame_mut(frame_id).last_used = self.virtual_time;

        self.oldest = self
            .frames
            .occupied()
            .min_by_key(|(_, frame)| frame.last_used)
            .map(|(frame_id, _)| frame_id)
            .unwrap_or(0);

        Outcome::Fault { frame: frame_id, evicted: evicted.address, flushed: evicted.dirty }
    }

    /// Advance virtual time, clearing every reference bit once per refresh period.
    fn tick(&mut self) {
        self.virtual_time += 1;
        self.ticks = (self.ticks + 1) % self.refresh_period;
        if self.ticks == 0 {
            for frame in self.frames.occupied_mut() {
                frame.referenced = false;
            }
        }
    }
}

impl Policy for WorkingSetClockPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Work
    }

    fn access(&mut self, address: Address, is_write: bool) -> Result<Outcome> {
        let outcome = match self.frames.find(&address) {
            Some(frame_id) => {
                let frame = self.frames.frame_mut(frame_id);
                frame.referenced = true;
                frame.last_used = self.virtual_time;
                frame.dirty |= is_write;
                Outcome::Hit { frame: frame_id }
            }
            None => {
                self.stats.page_faults += 1;
                match self.frames.load(address, is_write) {
                    Ok(frame_id) => {
                        self.frames.frame_mut(frame_id).last_used = self.virtual_time;
                        Outcome::Fault { frame: frame_id, evicted: None, flushed: false }
                    }
                    Err(address) => self.replace(address, is_write),
                }
            }
        };
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
