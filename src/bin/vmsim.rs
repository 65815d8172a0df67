use vmsim::config::Config;
use vmsim::error::{Error, Result};
use vmsim::simulator::Simulator;
use vmsim::trace::Trace;

fn main() -> Result<()> {
    let args = clap::command!()
        .about("Virtual memory page replacement simulator")
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path for the simulator")
                .default_value(""),
        )
        .arg(clap::Arg::new("frames").short('n').long("frames").help("Number of physical frames"))
        .arg(
            clap::Arg::new("algorithm")
                .short('a')
                .long("algorithm")
                .help("Replacement policy: opt, clock, aging or work"),
        )
        .arg(
            clap::Arg::new("refresh")
                .short('r')
                .long("refresh")
                .help("Accesses between aging decays or reference bit resets"),
        )
        .arg(clap::Arg::new("tau").short('t').long("tau").help("Working set window for work"))
        .arg(
            clap::Arg::new("compare")
                .long("compare")
                .help("Replay the trace with every policy")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(clap::Arg::new("trace_file").help("Trace file with one `<address> <R|W>` per line"))
        .get_matches();

    let mut overrides = vec![];
    for key in ["frames", "algorithm", "refresh", "tau", "trace_file"] {
        if let Some(value) = args.get_one::<String>(key) {
            overrides.push((key, value.clone()));
        }
    }
    if args.get_flag("compare") {
        overrides.push(("compare", "true".to_string()));
    }

    let config_file = args.get_one::<String>("config").map(String::as_str).unwrap_or_default();
    let cfg = Config::with_overrides(config_file, overrides)?;
    cfg.validate()?;

    let loglevel = cfg.log_level.parse::<log::LevelFilter>()?;
    env_logger::Builder::new()
        .filter_level(loglevel)
        .try_init()
        .map_err(|err| Error::Internal(err.to_string()))?;

    let trace = Trace::open(&cfg.trace_file)?;
    let compare = cfg.compare;
    let simulator = Simulator::new(cfg);
    if compare {
        for report in simulator.compare(&trace)? {
            println!("{}\n", report);
        }
    } else {
        println!("{}", simulator.run(&trace)?);
    }
    Ok(())
}
