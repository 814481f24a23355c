//! The tiered sampling engine.
//!
//! A session runs three threads, one per [`TierKind`]. Each owns its readers
//! and its record buffer outright and hands the buffer back when joined, so
//! the sampling loops share nothing but a few atomics (see [`SharedState`]).
//! The fast tier runs a short warmup first to prime the cumulative CPU
//! counters; the medium and slow tiers start sampling only once it is done.

mod markers;
mod session;
mod state;
mod tier;

pub use session::Session;
pub use tier::TierKind;

use markers::MarkerLog;
use state::SharedState;
use tier::{FastTier, MediumTier, SlowTier, TierContext, TierOutput};

use crate::common::Instant;
use crate::config::SamplingConfig;
use crate::trace::{FastSample, FileHeader, MediumSample, SlowSample, Trace};
use crate::{debug, error, info, warn, Error, Result};

use boardinfo::BoardDescriptor;
use parking_lot::Mutex;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

enum SessionState {
    Idle,
    Running(Workers),
    Stopped,
}

struct Workers {
    header: FileHeader,
    fast: JoinHandle<TierOutput<FastSample>>,
    medium: JoinHandle<TierOutput<MediumSample>>,
    slow: JoinHandle<TierOutput<SlowSample>>,
}

/// Records one trace file per start/stop cycle.
///
/// All control operations take `&self`, so an engine can be shared across
/// threads (for example behind an `Arc`) with one thread driving the session
/// while others call [`Engine::sync`].
pub struct Engine {
    output: PathBuf,
    board: BoardDescriptor,
    sampling: SamplingConfig,
    state: Arc<SharedState>,
    markers: MarkerLog,
    session: Mutex<SessionState>,
}

impl Engine {
    /// Validate the board and rates. Nothing is opened or spawned until
    /// [`Engine::start`].
    pub fn new(
        output: impl Into<PathBuf>,
        board: BoardDescriptor,
        sampling: SamplingConfig,
    ) -> Result<Self> {
        board.validate()?;
        sampling.check()?;

        Ok(Self {
            output: output.into(),
            board,
            sampling,
            state: Arc::new(SharedState::new()),
            markers: MarkerLog::default(),
            session: Mutex::new(SessionState::Idle),
        })
    }

    /// Begin a new session: open the data sources and spawn the tier
    /// threads. Buffers and markers from any earlier session are discarded.
    pub fn start(&self) -> Result<()> {
        let mut session = self.session.lock();

        if matches!(*session, SessionState::Running(_)) {
            return Err(Error::AlreadyRunning);
        }

        let fast = FastTier::open(&self.board);
        let medium = MediumTier::open(&self.board);
        let slow = SlowTier::open(&self.board);

        let header = FileHeader::for_session(&self.board, &self.sampling, fast.emc_available());

        self.markers.reset(&self.state);

        let epoch = Instant::now();
        let context = |hz| TierContext {
            state: self.state.clone(),
            epoch,
            hz,
            warmup_samples: self.sampling.warmup_samples,
        };

        let fast = tier::spawn(fast, context(self.sampling.fast_hz)).map_err(|source| {
            self.state.halt();
            Error::Spawn {
                tier: TierKind::Fast,
                source,
            }
        })?;

        let medium = match tier::spawn(medium, context(self.sampling.medium_hz)) {
            Ok(medium) => medium,
            Err(source) => {
                self.state.halt();
                let _ = fast.join();
                return Err(Error::Spawn {
                    tier: TierKind::Medium,
                    source,
                });
            }
        };

        let slow = match tier::spawn(slow, context(self.sampling.slow_hz)) {
            Ok(slow) => slow,
            Err(source) => {
                self.state.halt();
                let _ = fast.join();
                let _ = medium.join();
                return Err(Error::Spawn {
                    tier: TierKind::Slow,
                    source,
                });
            }
        };

        info!(
            "recording {} at {}/{}/{} Hz to {}",
            self.board.name,
            self.sampling.fast_hz,
            self.sampling.medium_hz,
            self.sampling.slow_hz,
            self.output.display()
        );

        *session = SessionState::Running(Workers {
            header,
            fast,
            medium,
            slow,
        });

        Ok(())
    }

    /// End the session: signal the tiers, join them, and write the trace.
    ///
    /// Returns the trace path, or `None` if no session was running. Safe to
    /// call repeatedly. If writing fails the session's data is lost.
    pub fn stop(&self) -> Result<Option<PathBuf>> {
        let mut session = self.session.lock();

        let workers = match std::mem::replace(&mut *session, SessionState::Stopped) {
            SessionState::Running(workers) => workers,
            other => {
                *session = other;
                return Ok(None);
            }
        };

        self.state.halt();

        // join every tier before reporting a failure from any of them
        let fast = join(workers.fast, TierKind::Fast);
        let medium = join(workers.medium, TierKind::Medium);
        let slow = join(workers.slow, TierKind::Slow);

        let (fast, medium, slow) = (fast?, medium?, slow?);

        let trace = Trace::new(
            workers.header,
            fast.records,
            medium.records,
            slow.records,
            self.markers.take(),
        );

        trace
            .write(&self.output)
            .map_err(|source| Error::Finalize {
                path: self.output.clone(),
                source,
            })?;

        info!(
            "wrote {} fast, {} medium, {} slow samples and {} markers to {}",
            trace.header.num_fast_samples,
            trace.header.num_medium_samples,
            trace.header.num_slow_samples,
            trace.header.num_markers,
            self.output.display()
        );

        Ok(Some(self.output.clone()))
    }

    /// Block until the fast tier has finished warmup. Returns immediately if
    /// no session is running.
    pub fn wait_for_warmup(&self) {
        self.state.wait_for_warmup();
    }

    /// As [`Engine::wait_for_warmup`], giving up after `timeout`. Returns
    /// whether warmup completed.
    pub fn wait_for_warmup_timeout(&self, timeout: Duration) -> bool {
        self.state
            .wait_for_warmup_until(std::time::Instant::now() + timeout)
    }

    /// Record an epoch marker at the current fast sample count and return its
    /// id. Ids start at 1 in each session.
    pub fn sync(&self) -> u64 {
        let id = self.markers.record(&self.state);
        debug!("epoch marker {id}");
        id
    }

    /// Fast samples recorded so far this session, including warmup. May lag
    /// the buffer by one record.
    pub fn sample_count(&self) -> u64 {
        self.state.fast_count()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn board(&self) -> &BoardDescriptor {
        &self.board
    }

    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Start a session and wait for warmup. The session stops when the
    /// returned guard is finished or dropped.
    pub fn session(&self) -> Result<Session<'_>> {
        Session::begin(self)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("failed to stop engine: {e}");
        }
    }
}

fn join<R>(handle: JoinHandle<TierOutput<R>>, tier: TierKind) -> Result<TierOutput<R>> {
    let output = handle
        .join()
        .map_err(|_| Error::SamplerPanicked { tier })?;

    if output.overruns > 0 {
        warn!(
            "{tier} tier overran its period {} times in {} samples",
            output.overruns,
            output.records.len()
        );
    } else {
        debug!("{tier} tier collected {} samples", output.records.len());
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panicked_tier_is_reported() {
        let handle = std::thread::spawn(|| -> TierOutput<FastSample> { panic!("sensor fault") });

        match join(handle, TierKind::Fast) {
            Err(Error::SamplerPanicked { tier }) => assert_eq!(tier, TierKind::Fast),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("a panicked tier joined cleanly"),
        }
    }

    #[test]
    fn finished_tier_is_joined() {
        let handle = std::thread::spawn(|| TierOutput {
            records: vec![SlowSample::default(); 3],
            overruns: 2,
        });

        let output = join(handle, TierKind::Slow).unwrap();
        assert_eq!(output.records.len(), 3);
        assert_eq!(output.overruns, 2);
    }
}
