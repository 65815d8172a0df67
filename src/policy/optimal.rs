use std::collections::HashMap;

use log::{debug, trace};

use super::frame::{FrameId, FrameTable};
use super::{Algorithm, Outcome, Policy, Stats};
use crate::error::{Error, Result};
use crate::trace::{Address, Trace};

/// FutureIndex maps every address of a trace to the ascending positions at
/// which it is accessed.
#[derive(Debug, Default)]
pub struct FutureIndex {
    positions: HashMap<Address, Vec<u64>>,
}

impl FutureIndex {
    pub fn build(events: impl IntoIterator<Item = (Address, u64)>) -> Self {
        let mut positions: HashMap<Address, Vec<u64>> = HashMap::new();
        for (address, position) in events {
            positions.entry(address).or_default().push(position);
        }
        for lines in positions.values_mut() {
            lines.sort_unstable();
        }
        FutureIndex { positions }
    }

    /// The first position strictly after `line` at which the address is accessed
    /// again, None if it never is.
    pub fn next_use(&self, address: &Address, line: u64) -> Option<u64> {
        let lines = self.positions.get(address)?;
        let i = lines.partition_point(|&position| position <= line);
        lines.get(i).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// OptimalPolicy implements Belady's optimal replacement.
///
/// It needs the whole trace in advance: the victim is the resident address whose
/// next access lies farthest in the future, and an address that is never
/// accessed again is always preferred. The future index must be built with
/// [`OptimalPolicy::build_future_index`] before the first access.
pub struct OptimalPolicy {
    frames: FrameTable,
    future: Option<FutureIndex>,
    /// position of the current access in the trace.
    current_line: u64,
    stats: Stats,
}

impl OptimalPolicy {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(OptimalPolicy {
            frames: FrameTable::new(capacity)?,
            future: None,
            current_line: 0,
            stats: Stats::default(),
        })
    }

    /// Create the policy with its future index built from the given trace.
    pub fn with_trace(capacity: usize, trace: &Trace) -> Result<Self> {
        let mut policy = Self::new(capacity)?;
        policy.build_future_index(trace.positions());
        Ok(policy)
    }

    pub fn build_future_index(&mut self, events: impl IntoIterator<Item = (Address, u64)>) {
        let index = FutureIndex::build(events);
        debug!("optimal future index built for {} distinct addresses", index.len());
        self.future = Some(index);
    }

    fn victim(&self, future: &FutureIndex) -> FrameId {
        let mut victim = 0;
        let mut farthest = 0;
        for (frame_id, frame) in self.frames.occupied() {
            let Some(address) = &frame.address else {
                continue;
            };
            match future.next_use(address, self.current_line) {
                None => return frame_id,
                Some(line) if line > farthest => {
                    victim = frame_id;
                    farthest = line;
                }
                Some(_) => {}
            }
        }
        victim
    }
}

impl Policy for OptimalPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Opt
    }

    fn access(&mut self, address: Address, is_write: bool) -> Result<Outcome> {
        let future = self.future.as_ref().ok_or(Error::UninitializedFutureIndex)?;

        let outcome = if let Some(frame_id) = self.frames.find(&address) {
            self.frames.frame_mut(frame_id).dirty |= is_write;
            Outcome::Hit { frame: frame_id }
        } else {
            self.stats.page_faults += 1;
            match self.frames.load(address, is_write) {
                Ok(frame_id) => Outcome::Fault { frame: frame_id, evicted: None, flushed: false },
                Err(address) => {
                    let frame_id = self.victim(future);
                    let evicted = self.frames.replace(frame_id, address, is_write);
                    if evicted.dirty {
                        self.stats.disk_writes += 1;
                    }
                    trace!("optimal evicted frame {} at line {}", frame_id, self.current_line);
                    Outcome::Fault {
                        frame: frame_id,
                        evicted: evicted.address,
                        flushed: evicted.dirty,
                    }
                }
            }
        };

        self.current_line += 1;
        Ok(outcome)
    }

    fn stats(&self) -> Stats {
        self.stats
    }

    fn frames(&self) -> &FrameTable {
        &self.frames
    }
}
