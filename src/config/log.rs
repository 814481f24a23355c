use super::*;

use ::log::Level;
use tracing_log::AsTrace;

/// The `[log]` section: the level used when no `-v` flag is given.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Log {
    #[serde(with = "LevelName", default = "default_level")]
    level: Level,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Log {
    pub fn level(&self) -> tracing::Level {
        self.level.as_trace()
    }

    /// The configured level raised by `verbose` repetitions of `-v`.
    pub fn level_with_verbosity(&self, verbose: u8) -> tracing::Level {
        raise_level(self.level(), verbose)
    }
}

/// One `-v` lifts `base` to at least debug, and two or more select trace.
pub fn raise_level(base: tracing::Level, verbose: u8) -> tracing::Level {
    match verbose {
        0 => base,
        1 => base.max(tracing::Level::DEBUG),
        _ => tracing::Level::TRACE,
    }
}

// level names as written in the config file
#[derive(Deserialize)]
#[serde(remote = "Level", rename_all = "lowercase")]
enum LevelName {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_level() -> Level {
    Level::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Log, toml::de::Error> {
        toml::from_str(text)
    }

    #[test]
    fn level_names() {
        assert_eq!(parse("level = \"error\"").unwrap().level(), tracing::Level::ERROR);
        assert_eq!(parse("level = \"trace\"").unwrap().level(), tracing::Level::TRACE);
        assert_eq!(parse("").unwrap().level(), tracing::Level::INFO);

        assert!(parse("level = \"WARN\"").is_err());
        assert!(parse("level = \"verbose\"").is_err());
        assert!(parse("level = \"info\"\nfile = \"x.log\"").is_err());
    }

    #[test]
    fn verbose_flags() {
        use tracing::Level;

        assert_eq!(raise_level(Level::WARN, 0), Level::WARN);
        assert_eq!(raise_level(Level::INFO, 1), Level::DEBUG);
        assert_eq!(raise_level(Level::TRACE, 1), Level::TRACE);
        assert_eq!(raise_level(Level::ERROR, 2), Level::TRACE);

        let log = parse("level = \"warn\"").unwrap();
        assert_eq!(log.level_with_verbosity(0), Level::WARN);
        assert_eq!(log.level_with_verbosity(1), Level::DEBUG);
    }
}
