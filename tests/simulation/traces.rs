use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use vmsim::config::Config;
use vmsim::error::Result;
use vmsim::policy::{new_policy, Algorithm, Policy};
use vmsim::trace::{Access, Trace};

/// A random trace over `pages` distinct addresses, a quarter of the accesses
/// being writes. Accesses are skewed towards a small hot set so every policy
/// sees both hits and evictions.
pub fn random_trace(seed: u64, len: usize, pages: u32) -> Trace {
    let mut rng = SmallRng::seed_from_u64(seed);
    let hot = (pages / 4).max(1);
    (0..len)
        .map(|_| {
            let page =
                if rng.gen_bool(0.7) { rng.gen_range(0..hot) } else { rng.gen_range(0..pages) };
            let address = format!("{:08x}", page << 12);
            if rng.gen_bool(0.25) {
                Access::write(address)
            } else {
                Access::read(address)
            }
        })
        .collect()
}

pub fn reads(addresses: &[&str]) -> Trace {
    addresses.iter().map(|&address| Access::read(address)).collect()
}

pub fn config(frames: usize, refresh: u64, tau: u64) -> Config {
    Config {
        algorithm: Algorithm::Clock,
        frames,
        refresh,
        tau,
        trace_file: String::new(),
        log_level: "debug".to_string(),
        compare: false,
    }
}

pub fn policy(algorithm: Algorithm, cfg: &Config, trace: &Trace) -> Result<Box<dyn Policy>> {
    new_policy(algorithm, cfg, trace)
}
