use std::ops::Deref;
use std::path::PathBuf;

use super::Engine;
use crate::{warn, Result};

/// A running session that stops its engine when finished or dropped.
///
/// Dropping the guard without calling [`Session::finish`] still stops the
/// engine and writes the trace, but any error is only logged.
pub struct Session<'a> {
    engine: &'a Engine,
    finished: bool,
}

impl<'a> Session<'a> {
    pub(super) fn begin(engine: &'a Engine) -> Result<Self> {
        engine.start()?;
        engine.wait_for_warmup();

        Ok(Self {
            engine,
            finished: false,
        })
    }

    /// Stop the engine and return the path of the written trace.
    pub fn finish(mut self) -> Result<Option<PathBuf>> {
        self.finished = true;
        self.engine.stop()
    }
}

impl Deref for Session<'_> {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        self.engine
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        if let Err(e) = self.engine.stop() {
            warn!("session ended with an error: {e}");
        }
    }
}
