use parking_lot::{Condvar, Mutex};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// State shared between the engine and its tier threads for one session.
///
/// Every flag and counter read that gates later work uses `Acquire`, and
/// every write that publishes completed work uses `Release`. The warmup
/// mutex is touched once by the fast tier when it signals and once per
/// waiter; the sampling loops never take it otherwise.
pub(crate) struct SharedState {
    running: AtomicBool,
    warmed_up: AtomicBool,
    fast_count: AtomicU64,
    warmup_lock: Mutex<()>,
    warmup: Condvar,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            warmed_up: AtomicBool::new(false),
            fast_count: AtomicU64::new(0),
            warmup_lock: Mutex::new(()),
            warmup: Condvar::new(),
        }
    }

    /// Reset for a new session and mark it running.
    pub fn begin_session(&self) {
        let _lock = self.warmup_lock.lock();
        self.fast_count.store(0, Ordering::Release);
        self.warmed_up.store(false, Ordering::Release);
        self.running.store(true, Ordering::Release);
    }

    /// Ask every tier to exit and release anyone blocked on warmup.
    pub fn halt(&self) {
        {
            let _lock = self.warmup_lock.lock();
            self.running.store(false, Ordering::Release);
        }
        self.warmup.notify_all();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn finish_warmup(&self) {
        {
            let _lock = self.warmup_lock.lock();
            self.warmed_up.store(true, Ordering::Release);
        }
        self.warmup.notify_all();
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up.load(Ordering::Acquire)
    }

    /// Block until warmup completes or the session is halted.
    pub fn wait_for_warmup(&self) {
        let mut lock = self.warmup_lock.lock();
        while !self.is_warmed_up() && self.is_running() {
            self.warmup.wait(&mut lock);
        }
    }

    /// As [`Self::wait_for_warmup`], giving up at `deadline`. Returns whether
    /// warmup completed.
    pub fn wait_for_warmup_until(&self, deadline: Instant) -> bool {
        let mut lock = self.warmup_lock.lock();
        while !self.is_warmed_up() && self.is_running() {
            if self.warmup.wait_until(&mut lock, deadline).timed_out() {
                break;
            }
        }
        self.is_warmed_up()
    }

    /// Publish one appended fast sample. Called only by the fast tier, after
    /// the append.
    pub fn record_fast_sample(&self) {
        self.fast_count.fetch_add(1, Ordering::Release);
    }

    pub fn fast_count(&self) -> u64 {
        self.fast_count.load(Ordering::Acquire)
    }
}
