use std::fs;

use vmsim::config::Config;
use vmsim::error::Result;
use vmsim::policy::{Algorithm, Stats};
use vmsim::simulator::{replay, Simulator};
use vmsim::trace::Trace;

use super::traces::{config, policy, reads};

#[test]
fn test_clock_second_chance() -> Result<()> {
    setup!();
    let trace = reads(&["A", "B", "C", "A"]);
    let mut policy = policy(Algorithm::Clock, &config(2, 1, 1), &trace)?;
    let stats = replay(policy.as_mut(), &trace)?;
    assert_eq!(Stats { page_faults: 3, disk_writes: 0 }, stats);
    Ok(())
}

#[test]
fn test_aging_single_frame() -> Result<()> {
    setup!();
    let trace = reads(&["A", "A", "B"]);
    let mut policy = policy(Algorithm::Aging, &config(1, 2, 1), &trace)?;
    let stats = replay(policy.as_mut(), &trace)?;
    assert_eq!(Stats { page_faults: 2, disk_writes: 0 }, stats);
    Ok(())
}

#[test]
fn test_trace_file() -> Result<()> {
    setup!();
    let path = std::env::temp_dir().join(format!("vmsim-trace-{}.trace", std::process::id()));
    fs::write(
        &path,
        "0041f7a0 R\n13f5e2c0 W\n05e78900 R\n0041f7a0 W\n13f5e2c0 R\n05e78900 W\n3d729358 R\n",
    )?;
    let file = path.to_str().unwrap_or_default().to_string();
    let cfg = Config::with_overrides(
        "",
        vec![("frames", "2".to_string()), ("trace_file", file.clone())],
    );
    let trace = Trace::open(&file);
    fs::remove_file(&path)?;
    let (cfg, trace) = (cfg?, trace?);
    cfg.validate()?;

    assert_eq!(7, trace.len());
    let reports = Simulator::new(cfg).compare(&trace)?;
    assert_eq!(4, reports.len());
    for report in &reports {
        assert_eq!(2, report.frames);
        assert_eq!(7, report.accesses);
    }

    // C evicts the dirty B, which is needed later than A. B then evicts A, dirtied
    // at line 4 and never used again, and D finally evicts the clean B.
    let optimal = &reports[0];
    assert_eq!(Algorithm::Opt, optimal.algorithm);
    assert_eq!(Stats { page_faults: 5, disk_writes: 2 }, optimal.stats);
    Ok(())
}

#[test]
fn test_missing_trace_file() {
    assert!(Trace::open("/nonexistent/vmsim.trace").is_err());
}
