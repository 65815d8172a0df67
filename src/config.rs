use serde::Deserialize;

use crate::config_err;
use crate::error::Result;
use crate::policy::Algorithm;

#[derive(Debug, PartialEq, Deserialize)]
pub struct Config {
    pub algorithm: Algorithm,
    /// number of physical frames.
    pub frames: usize,
    /// accesses between two aging decays or reference bit resets.
    pub refresh: u64,
    /// working set window of the WSClock policy.
    pub tau: u64,
    pub trace_file: String,
    pub log_level: String,
    /// replay every policy over the same trace instead of just `algorithm`.
    pub compare: bool,
}

impl Config {
    pub fn new(file: &str) -> Result<Config> {
        Self::with_overrides(file, vec![])
    }

    /// Load the config from defaults, the optional file and `VMSIM_*` environment
    /// variables, in that order. The given overrides take precedence over all of them.
    pub fn with_overrides(file: &str, overrides: Vec<(&str, String)>) -> Result<Config> {
        let mut cfg = config::Config::builder()
            .set_default("algorithm", "clock")?
            .set_default("frames", 8)?
            .set_default("refresh", 10)?
            .set_default("tau", 10)?
            .set_default("trace_file", "")?
            .set_default("log_level", "info")?
            .set_default("compare", false)?;
        if !file.is_empty() {
            cfg = cfg.add_source(config::File::with_name(file))
        }
        cfg = cfg.add_source(config::Environment::with_prefix("VMSIM"));
        for (key, value) in overrides {
            cfg = cfg.set_override(key, value)?;
        }
        Ok(cfg.build()?.try_deserialize()?)
    }

    /// Check the settings the policies do not validate themselves.
    pub fn validate(&self) -> Result<()> {
        if self.trace_file.is_empty() {
            return Err(config_err!("no trace file given"));
        }
        Ok(())
    }
}
