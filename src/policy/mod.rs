use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::config::Config;
use crate::error::Result;
use crate::trace::{Address, Trace};

pub mod aging;
pub mod clock;
pub mod frame;
pub mod optimal;
pub mod wsclock;

use frame::{FrameId, FrameTable};

/// Policy is a page replacement state machine over a fixed set of frames.
///
/// Every access either hits a resident frame or faults. On a fault the policy
/// loads the address into a free frame, or, once the table is full, picks a
/// victim to overwrite, writing it back to disk first if it is dirty.
pub trait Policy {
    fn algorithm(&self) -> Algorithm;

    /// Replay one memory access against the frame table.
    fn access(&mut self, address: Address, is_write: bool) -> Result<Outcome>;

    /// Fault and write-back counters accumulated so far.
    fn stats(&self) -> Stats;

    fn frames(&self) -> &FrameTable;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Clock,
    Aging,
    #[serde(alias = "optimal")]
    Opt,
    #[serde(alias = "wsclock")]
    Work,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] =
        [Algorithm::Opt, Algorithm::Clock, Algorithm::Aging, Algorithm::Work];
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Clock => "Clock",
            Algorithm::Aging => "Aging",
            Algorithm::Opt => "Optimal",
            Algorithm::Work => "Working Set Clock",
        };
        write!(f, "{}", name)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub page_faults: u64,
    pub disk_writes: u64,
}

/// What a single access did to the frame table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Hit { frame: FrameId },
    Fault {
        frame: FrameId,
        /// The address overwritten to make room, None if a free frame was used.
        evicted: Option<Address>,
        /// Whether the evicted frame was dirty and had to be written back.
        flushed: bool,
    },
}

impl Outcome {
    pub fn is_fault(&self) -> bool {
        matches!(self, Outcome::Fault { .. })
    }

    /// The frame that now holds the accessed address.
    pub fn frame(&self) -> FrameId {
        match self {
            Outcome::Hit { frame } | Outcome::Fault { frame, .. } => *frame,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Hit { frame } => write!(f, "hit frame {}", frame),
            Outcome::Fault { frame, evicted: None, .. } => {
                write!(f, "fault into free frame {}", frame)
            }
            Outcome::Fault { frame, evicted: Some(victim), flushed } => write!(
                f,
                "fault evicting {} from frame {}{}",
                victim,
                frame,
                if *flushed { " (dirty)" } else { "" }
            ),
        }
    }
}

/// Create the policy selected by the config. The optimal policy needs the whole
/// trace up front to build its future index.
pub fn new_policy(algorithm: Algorithm, cfg: &Config, trace: &Trace) -> Result<Box<dyn Policy>> {
    match algorithm {
        Algorithm::Clock => Ok(Box::new(clock::ClockPolicy::new(cfg.frames)?)),
        Algorithm::Aging => Ok(Box::new(aging::AgingPolicy::new(cfg.frames, cfg.refresh)?)),
        Algorithm::Opt => Ok(Box::new(optimal::OptimalPolicy::with_trace(cfg.frames, trace)?)),
        Algorithm::Work => {
            Ok(Box::new(wsclock::WorkingSetClockPolicy::new(cfg.frames, cfg.refresh, cfg.tau)?))
        }
    }
}
