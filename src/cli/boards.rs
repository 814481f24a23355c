use clap::{ArgMatches, Command};

pub struct Config {
    json: bool,
}

impl TryFrom<ArgMatches> for Config {
    type Error = anyhow::Error;

    fn try_from(args: ArgMatches) -> Result<Self, Self::Error> {
        Ok(Config {
            json: args.get_flag("JSON"),
        })
    }
}

pub fn command() -> Command {
    Command::new("boards")
        .about("List the built-in board presets")
        .arg(
            clap::Arg::new("JSON")
                .long("json")
                .help("Print the full preset descriptors as JSON")
                .action(clap::ArgAction::SetTrue),
        )
}

pub fn run(config: Config) -> anyhow::Result<()> {
    let boards = boardinfo::preset_names()
        .map(boardinfo::preset)
        .collect::<Result<Vec<_>, _>>()?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&boards)?);
        return Ok(());
    }

    for board in boards {
        println!(
            "{:<12} {:>2} cores  {} rails  {:>2} zones  gpu: {}  emc: {}",
            board.name,
            board.num_cpu_cores,
            board.power_rails.len(),
            board.thermal_zones.len(),
            if board.gpu_load.is_some() { "yes" } else { "no" },
            if board.emc_util.is_some() { "yes" } else { "no" },
        );
    }

    Ok(())
}
