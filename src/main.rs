use clap::Command;

mod cli;

use cli::{boards, inspect, record};

fn main() {
    // parse command line options
    let matches = Command::new(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_about(
            "tierscope records GPU, CPU, memory, power and thermal telemetry on \
            embedded compute boards at up to kilohertz rates.",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(record::command())
        .subcommand(inspect::command())
        .subcommand(boards::command())
        .get_matches();

    let result = match matches.subcommand() {
        Some(("record", args)) => record::Config::try_from(args.clone()).and_then(record::run),
        Some(("inspect", args)) => inspect::Config::try_from(args.clone()).and_then(inspect::run),
        Some(("boards", args)) => boards::Config::try_from(args.clone()).and_then(boards::run),
        _ => unreachable!("a subcommand is required"),
    };

    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
