use std::fmt::{Display, Formatter};

use log::{info, trace};

use crate::config::Config;
use crate::error::Result;
use crate::policy::{new_policy, Algorithm, Policy, Stats};
use crate::trace::Trace;

/// Summary of one policy's run over a trace.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub algorithm: Algorithm,
    pub frames: usize,
    pub accesses: usize,
    pub stats: Stats,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Number of frames:       {}", self.frames)?;
        writeln!(f, "Total memory accesses:  {}", self.accesses)?;
        writeln!(f, "Total page faults:      {}", self.stats.page_faults)?;
        write!(f, "Total writes to disk:   {}", self.stats.disk_writes)
    }
}

/// Simulator drives traces through page replacement policies.
pub struct Simulator {
    cfg: Config,
}

impl Simulator {
    pub fn new(cfg: Config) -> Self {
        Simulator { cfg }
    }

    /// Replay the trace with the configured algorithm.
    pub fn run(&self, trace: &Trace) -> Result<Report> {
        let mut reports = self.run_all(&[self.cfg.algorithm], trace)?;
        Ok(reports.remove(0))
    }

    /// Replay the trace with every algorithm, in a single pass over the trace.
    pub fn compare(&self, trace: &Trace) -> Result<Vec<Report>> {
        self.run_all(&Algorithm::ALL, trace)
    }

    fn run_all(&self, algorithms: &[Algorithm], trace: &Trace) -> Result<Vec<Report>> {
        let mut policies = algorithms
            .iter()
            .map(|&algorithm| new_policy(algorithm, &self.cfg, trace))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "replaying {} accesses over {} frames with {:?}",
            trace.len(),
            self.cfg.frames,
            algorithms
        );

        for access in trace.iter() {
            for policy in policies.iter_mut() {
                let outcome = policy.access(access.address.clone(), access.is_write)?;
                trace!("{}: {} -> {} {}", policy.algorithm(), access, outcome, policy.frames());
            }
        }

        Ok(policies
            .iter()
            .map(|policy| Report {
                algorithm: policy.algorithm(),
                frames: self.cfg.frames,
                accesses: trace.len(),
                stats: policy.stats(),
            })
            .collect())
    }
}

/// Replay a whole trace through a single policy and return its final counters.
pub fn replay(policy: &mut dyn Policy, trace: &Trace) -> Result<Stats> {
    for access in trace.iter() {
        policy.access(access.address.clone(), access.is_write)?;
    }
    Ok(policy.stats())
}
