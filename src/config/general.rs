use super::*;

use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "output")]
    output: PathBuf,

    // preset name; when absent and no [board] table is given, the running
    // board is detected
    #[serde(default)]
    board: Option<String>,

    // humantime string, e.g. "30s" or "5m"; absent records until interrupted
    #[serde(default)]
    duration: Option<String>,
}

impl Default for General {
    fn default() -> Self {
        Self {
            output: output(),
            board: None,
            duration: None,
        }
    }
}

impl General {
    pub fn check(&self) -> anyhow::Result<()> {
        if let Some(duration) = &self.duration {
            duration
                .parse::<humantime::Duration>()
                .with_context(|| format!("general.duration couldn't be parsed: {duration}"))?;
        }

        Ok(())
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn board(&self) -> Option<&str> {
        self.board.as_deref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
            .as_ref()
            .and_then(|d| d.parse::<humantime::Duration>().ok())
            .map(Into::into)
    }
}

fn output() -> PathBuf {
    "trace.bin".into()
}
