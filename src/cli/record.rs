use anyhow::Context;
use clap::{value_parser, ArgMatches, Command};
use tierscope::config::Config as FileConfig;
use tierscope::Engine;
use tracing::{debug, info, warn};

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// how often the main thread checks for the end of the recording
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct Config {
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    board: Option<String>,
    duration: Option<humantime::Duration>,
    verbose: u8,
}

impl TryFrom<ArgMatches> for Config {
    type Error = anyhow::Error;

    fn try_from(args: ArgMatches) -> Result<Self, Self::Error> {
        Ok(Config {
            output: args.get_one::<PathBuf>("OUTPUT").cloned(),
            config: args.get_one::<PathBuf>("CONFIG").cloned(),
            board: args.get_one::<String>("BOARD").cloned(),
            duration: args.get_one::<humantime::Duration>("DURATION").copied(),
            verbose: args.get_count("VERBOSE"),
        })
    }
}

pub fn command() -> Command {
    Command::new("record")
        .about("Record a trace until the duration elapses or Ctrl-C")
        .arg(
            clap::Arg::new("OUTPUT")
                .help("Path to the output file (default from config, else trace.bin)")
                .action(clap::ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            clap::Arg::new("CONFIG")
                .long("config")
                .short('c')
                .help("TOML configuration file")
                .action(clap::ArgAction::Set)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            clap::Arg::new("BOARD")
                .long("board")
                .short('b')
                .help("Board preset to use instead of detecting the board")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("DURATION")
                .long("duration")
                .short('d')
                .help("Stop recording after this long, e.g. 30s")
                .action(clap::ArgAction::Set)
                .value_parser(value_parser!(humantime::Duration)),
        )
        .arg(
            clap::Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase the verbosity")
                .action(clap::ArgAction::Count),
        )
}

/// Runs a recording session. Each line read from stdin (pressing Enter)
/// records an epoch marker. The trace is written when the duration elapses
/// or on the first Ctrl-C; a second Ctrl-C exits without writing.
pub fn run(config: Config) -> anyhow::Result<()> {
    let file_config = match &config.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    super::init_logging(file_config.log().level_with_verbosity(config.verbose))?;

    if let Some(path) = &config.config {
        debug!("loaded config: {}", path.display());
    }

    let board = file_config.resolve_board(config.board.as_deref())?;

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| file_config.general().output().to_path_buf());

    let duration = config
        .duration
        .map(Duration::from)
        .or_else(|| file_config.general().duration());

    let engine = Arc::new(Engine::new(output, board, file_config.sampling().clone())?);

    let interrupted = Arc::new(AtomicBool::new(false));

    ctrlc::set_handler({
        let interrupted = interrupted.clone();
        move || {
            if interrupted.swap(true, Ordering::SeqCst) {
                warn!("terminating immediately");
                std::process::exit(2);
            }
            info!("finalizing recording...");
        }
    })
    .context("failed to set ctrl-c handler")?;

    let session = engine.session()?;

    match duration {
        Some(d) => info!(
            "recording for {}; press Enter to mark an epoch",
            humantime::format_duration(d)
        ),
        None => info!("recording; press Enter to mark an epoch, Ctrl-C to stop"),
    }

    // the marker thread blocks on stdin and is left behind at exit
    std::thread::Builder::new()
        .name("tierscope-markers".to_string())
        .spawn({
            let engine = engine.clone();
            move || mark_epochs(&engine)
        })
        .context("failed to spawn marker thread")?;

    let start = Instant::now();

    while !interrupted.load(Ordering::SeqCst) && session.is_running() {
        if duration.is_some_and(|d| start.elapsed() >= d) {
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    let samples = session.sample_count();

    match session.finish()? {
        Some(path) => println!("{samples} fast samples written to {}", path.display()),
        None => warn!("no session was running; nothing written"),
    }

    Ok(())
}

fn mark_epochs(engine: &Engine) {
    for line in std::io::stdin().lock().lines() {
        if line.is_err() || !engine.is_running() {
            break;
        }

        let id = engine.sync();
        info!("epoch {id} at fast sample {}", engine.sample_count());
    }
}
