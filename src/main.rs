use std::process;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use vault_door::{
    config::GameConfig,
    dispatch::Dispatcher,
    engine::Session,
    logging,
    player::Player,
    types::{Combination, Direction, Effect, OutcomeEvent},
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "vault-door play [--seed N]";
const SOLVE_USAGE: &str = "vault-door solve [--seed N] [--stumble]";
const CONFIG_USAGE: &str = "vault-door config";

struct Options {
    seed: Option<u64>,
    stumble: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut options = Options {
        seed: None,
        stumble: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                let seed = value
                    .parse()
                    .with_context(|| format!("Invalid seed {value}"))?;
                options.seed = Some(seed);
            }
            "--stumble" => options.stumble = true,
            other => bail!("Unknown option {other}"),
        }
    }
    Ok(options)
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let command = args.next();
    let options = parse_options(args)?;

    // The player logs to a file once its config is known; stderr belongs to
    // the terminal UI.
    if command.as_deref() != Some("play") {
        logging::init_stderr();
    }

    let mut config = GameConfig::load();
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    config.validate()?;

    match command.as_deref() {
        Some("play") => play(config),
        Some("solve") => solve(&config, options.stumble),
        Some("config") => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        _ => bail!(
            "Vault Door — turn the handle, find the combination\n\nUsage:\n  {PLAY_USAGE}\n  {SOLVE_USAGE}\n  {CONFIG_USAGE}"
        ),
    }
}

fn play(config: GameConfig) -> Result<()> {
    if let Some(path) = &config.log_file {
        logging::init_file(path)?;
    }
    let session = Session::from_config(&config)?;
    let mut player = Player::new(session, config);
    player.play()
}

#[derive(Serialize)]
struct ClickRecord<'a> {
    click: usize,
    direction: Direction,
    event: OutcomeEvent,
    combination: &'a Combination,
    effects: Vec<Effect>,
}

/// Play a session without a terminal: optionally one wrong click, then the
/// exact solution, then one click past the end. One JSON line per click.
fn solve(config: &GameConfig, stumble: bool) -> Result<()> {
    let mut session = Session::from_config(config)?;
    eprintln!("Combination: {}", session.state().combination());

    let mut clicks = 0usize;
    let mut turn = |session: &mut Session, direction: Direction| -> Result<()> {
        clicks += 1;
        let event = session.click(direction);
        let record = ClickRecord {
            click: clicks,
            direction,
            event,
            combination: session.state().combination(),
            effects: Dispatcher::dispatch(&event, session.state()),
        };
        println!("{}", serde_json::to_string(&record)?);
        Ok(())
    };

    if stumble {
        let first = session.state().combination().steps()[0].direction();
        turn(&mut session, first.opposite())?;
        eprintln!("New combination: {}", session.state().combination());
    }

    let solution: Vec<_> = session.state().combination().solution().collect();
    for direction in solution {
        turn(&mut session, direction)?;
    }
    turn(&mut session, Direction::Clockwise)?;

    if !session.state().is_solved() {
        bail!("Session did not reach the solved state");
    }
    eprintln!("Unlocked after {clicks} clicks");
    Ok(())
}
