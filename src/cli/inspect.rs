use anyhow::Context;
use clap::{value_parser, ArgMatches, Command};
use tierscope::config::raise_level;
use tierscope::trace::read_trace;
use tracing::{debug, Level};

use std::path::PathBuf;

pub struct Config {
    input: PathBuf,
    json: bool,
    verbose: u8,
}

impl TryFrom<ArgMatches> for Config {
    type Error = anyhow::Error;

    fn try_from(args: ArgMatches) -> Result<Self, Self::Error> {
        Ok(Config {
            input: args
                .get_one::<PathBuf>("INPUT")
                .cloned()
                .context("an input file is required")?,
            json: args.get_flag("JSON"),
            verbose: args.get_count("VERBOSE"),
        })
    }
}

pub fn command() -> Command {
    Command::new("inspect")
        .about("Summarize a recorded trace")
        .arg(
            clap::Arg::new("INPUT")
                .help("Trace file")
                .action(clap::ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("JSON")
                .long("json")
                .help("Print the summary as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase the verbosity")
                .action(clap::ArgAction::Count),
        )
}

pub fn run(config: Config) -> anyhow::Result<()> {
    super::init_logging(raise_level(Level::WARN, config.verbose))?;

    let trace = read_trace(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;

    debug!("decoded header: {:?}", trace.header);

    let summary = trace.summary();

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }

    Ok(())
}
