use log::debug;
use vmsim::error::Result;
use vmsim::policy::{Algorithm, Stats};
use vmsim::simulator::{replay, Simulator};
use vmsim::trace::{Access, Trace};

use super::traces::{config, policy, random_trace, reads};

#[test]
fn test_distinct_addresses_all_fault() -> Result<()> {
    setup!();
    let trace = reads(&["a", "b", "c", "d", "e"]);
    let cfg = config(5, 3, 3);
    for algorithm in Algorithm::ALL {
        let mut policy = policy(algorithm, &cfg, &trace)?;
        let mut faults = 0;
        for access in trace.iter() {
            if policy.access(access.address.clone(), access.is_write)?.is_fault() {
                faults += 1;
            }
        }
        assert_eq!(5, faults, "{}", algorithm);
        assert_eq!(Stats { page_faults: 5, disk_writes: 0 }, policy.stats(), "{}", algorithm);
    }
    Ok(())
}

#[test]
fn test_immediate_reaccess_hits() -> Result<()> {
    setup!();
    // every access is followed by a read of the same address.
    let trace: Trace = random_trace(7, 2_000, 64)
        .iter()
        .flat_map(|access| [access.clone(), Access::read(access.address.as_str())])
        .collect();
    let cfg = config(8, 5, 20);
    for algorithm in Algorithm::ALL {
        let mut policy = policy(algorithm, &cfg, &trace)?;
        for (i, access) in trace.iter().enumerate() {
            let outcome = policy.access(access.address.clone(), access.is_write)?;
            if i % 2 == 1 {
                assert!(
                    !outcome.is_fault(),
                    "{} faulted on re-access of {}",
                    algorithm,
                    access.address
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_replay_is_deterministic() -> Result<()> {
    setup!();
    let trace = random_trace(42, 5_000, 128);
    let cfg = config(16, 10, 50);
    for algorithm in Algorithm::ALL {
        let first = replay(policy(algorithm, &cfg, &trace)?.as_mut(), &trace)?;
        let second = replay(policy(algorithm, &cfg, &trace)?.as_mut(), &trace)?;
        debug!("{}: {:?}", algorithm, first);
        assert_eq!(first, second, "{}", algorithm);
    }
    Ok(())
}

#[test]
fn test_optimal_is_a_lower_bound() -> Result<()> {
    setup!();
    for seed in 0..8 {
        let trace = random_trace(seed, 3_000, 96);
        for frames in [1, 4, 16, 64] {
            let reports = Simulator::new(config(frames, 8, 30)).compare(&trace)?;
            let optimal = reports
                .iter()
                .find(|report| report.algorithm == Algorithm::Opt)
                .map(|report| report.stats.page_faults)
                .unwrap_or_default();
            for report in &reports {
                assert!(
                    optimal <= report.stats.page_faults,
                    "seed {} frames {}: optimal {} > {} {}",
                    seed,
                    frames,
                    optimal,
                    report.algorithm,
                    report.stats.page_faults
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_read_only_trace_never_writes_back() -> Result<()> {
    setup!();
    let trace: Trace = random_trace(3, 4_000, 64)
        .iter()
        .map(|access| Access::read(access.address.as_str()))
        .collect();
    for report in Simulator::new(config(8, 4, 4)).compare(&trace)? {
        assert_eq!(0, report.stats.disk_writes, "{}", report.algorithm);
        assert!(report.stats.page_faults > 8, "{}", report.algorithm);
    }
    Ok(())
}

#[test]
fn test_disk_writes_bounded_by_dirty_evictions() -> Result<()> {
    setup!();
    let trace = random_trace(11, 4_000, 64);
    let writes = trace.iter().filter(|access| access.is_write).count() as u64;
    for report in Simulator::new(config(8, 4, 16)).compare(&trace)? {
        // every write back needs a write access that dirtied the frame first.
        assert!(report.stats.disk_writes <= writes, "{}", report.algorithm);
        if report.algorithm != Algorithm::Work {
            // outside WSClock's scheduled write backs, only evictions write to disk.
            let evictions = report.stats.page_faults.saturating_sub(8);
            assert!(report.stats.disk_writes <= evictions, "{}", report.algorithm);
        }
    }
    Ok(())
}
