use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Advisory stop request shared between a pipeline invocation and its host.
///
/// The flag is only consulted at [`Checkpoint`] boundaries, never between
/// computing and committing a circle or a path point, so a cancelled stage
/// always returns a consistent partial result.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Periodic suspension point for long loops.
///
/// `poll` is called once per committed unit of work; on the first call and
/// every `interval`-th call thereafter it checks the token (returning `true`
/// when the loop should stop) and otherwise yields the thread so a
/// multi-threaded host can schedule around a long generation.
#[derive(Debug)]
pub struct Checkpoint {
    interval: u32,
    ticks: u32,
}

/// One scheduler yield per 100 committed work units.
pub const CHECKPOINT_INTERVAL: u32 = 100;

impl Checkpoint {
    pub fn every(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ticks: 0,
        }
    }

    pub fn poll(&mut self, token: &CancelToken) -> bool {
        let hit = self.ticks % self.interval == 0;
        self.ticks = self.ticks.wrapping_add(1);
        if !hit {
            return false;
        }
        if token.is_cancelled() {
            return true;
        }
        std::thread::yield_now();
        false
    }
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self::every(CHECKPOINT_INTERVAL)
    }
}
