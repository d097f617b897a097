use std::path::PathBuf;

use stardrift_data::config::EngineConfig;
use stardrift_data::syslog::TurnEvent;

mod report;
mod scenario;

const DEFAULT_TURNS: u32 = 50;
const DEFAULT_SEED: u64 = 0;
const USAGE: &str = "Usage: stardrift-sim [--turns N] [--seed S] [--config FILE] [--verbose]";

struct Args {
    turns: u32,
    seed: u64,
    config: Option<PathBuf>,
    verbose: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Args, String> {
    let mut parsed = Args {
        turns: DEFAULT_TURNS,
        seed: DEFAULT_SEED,
        config: None,
        verbose: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => parsed.verbose = true,
            "--turns" | "--seed" | "--config" => {
                let Some(val) = args.next() else {
                    return Err(format!("Missing value after {arg}"));
                };
                match arg.as_str() {
                    "--turns" => {
                        parsed.turns = val
                            .parse()
                            .map_err(|_| format!("Invalid turn count {val:?}"))?
                    }
                    "--seed" => {
                        parsed.seed = val.parse().map_err(|_| format!("Invalid seed {val:?}"))?
                    }
                    _ => parsed.config = Some(PathBuf::from(val)),
                }
            }
            _ => return Err(format!("Unknown argument {arg:?}")),
        }
    }
    Ok(parsed)
}

fn load_config(path: &Option<PathBuf>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Unable to read {}: {e}", path.display()))?;
    EngineConfig::from_json(&data).map_err(|e| format!("Invalid config {}: {e}", path.display()))
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(msg) => {
            log::error!("{msg}");
            std::process::exit(1);
        }
    };
    let mut universe = match scenario::create_universe(config) {
        Ok(universe) => universe,
        Err(e) => {
            log::error!("Unable to create the universe: {}", e.errmsg());
            std::process::exit(1);
        }
    };
    log::info!(
        "Running {} turns with seed {} on {} systems",
        args.turns,
        args.seed,
        universe.systems().count()
    );

    let mut players: Vec<scenario::Player> = universe
        .civs()
        .map(|c| scenario::Player::new(c.id, args.seed))
        .collect();
    let mut events: Vec<(u32, TurnEvent)> = vec![];
    for _ in 0..args.turns {
        for player in players.iter_mut() {
            player.play(&mut universe);
        }
        let turn_events = universe.update();
        let turn = universe.turn();
        events.extend(turn_events.into_iter().map(|e| (turn, e)));
    }

    let report = report::report(&universe, &events);
    match serde_json::to_string_pretty(&report) {
        Ok(out) => println!("{out}"),
        Err(e) => log::error!("Unable to render the report: {e}"),
    }
}

#[test]
fn test_parse_args() {
    let args = |s: &str| parse_args(s.split_whitespace().map(String::from));
    let parsed = args("--turns 12 --seed 9 --verbose").unwrap();
    assert_eq!(parsed.turns, 12);
    assert_eq!(parsed.seed, 9);
    assert!(parsed.verbose);
    assert!(parsed.config.is_none());

    let parsed = args("--config tuning.json").unwrap();
    assert_eq!(parsed.turns, DEFAULT_TURNS);
    assert_eq!(parsed.config, Some(PathBuf::from("tuning.json")));

    assert!(args("--turns").is_err());
    assert!(args("--turns many").is_err());
    assert!(args("--fast").is_err());
}
