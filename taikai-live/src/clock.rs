use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use taikai_core::{BoutDuration, Clock, Tick};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::Result;

/// The default tick period. One tick removes one centisecond.
pub const TICK: Duration = Duration::from_millis(10);

/// A [`Clock`] that counts down in real time.
///
/// While the clock is running a background task ticks it once per tick period. The task is
/// cancelled when the clock is stopped, reset or dropped; no tick is applied after that.
/// Every change of the clock is published to [`watch`] receivers.
///
/// Starting the clock requires a tokio runtime on the calling thread.
#[derive(Clone, Debug)]
pub struct MatchClock {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    shared: Arc<Shared>,
    task: Mutex<Option<TickTask>>,
    period: Duration,
}

#[derive(Debug)]
struct Shared {
    clock: Mutex<Clock>,
    tx: watch::Sender<Clock>,
}

impl MatchClock {
    /// Creates a new stopped `MatchClock` using the default [`TICK`] period.
    #[inline]
    pub fn new(duration: BoutDuration) -> Self {
        Self::with_period(duration, TICK)
    }

    /// Creates a new stopped `MatchClock` that ticks every `period`.
    pub fn with_period(duration: BoutDuration, period: Duration) -> Self {
        let clock = Clock::new(duration);
        let (tx, _) = watch::channel(clock);

        Self {
            inner: Arc::new(Inner {
                shared: Arc::new(Shared {
                    clock: Mutex::new(clock),
                    tx,
                }),
                task: Mutex::new(None),
                period,
            }),
        }
    }

    /// Returns the current state of the clock.
    pub fn snapshot(&self) -> Clock {
        *self.inner.shared.clock.lock()
    }

    pub fn watch(&self) -> watch::Receiver<Clock> {
        self.inner.shared.tx.subscribe()
    }

    pub fn select_duration(&self, duration: BoutDuration) -> Result<()> {
        self.inner
            .shared
            .update(|clock| clock.select_duration(duration))?;

        Ok(())
    }

    /// Starts the clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] if there is no tokio runtime to run the tick task on. The
    /// clock is left unchanged in that case.
    ///
    /// [`Error::Runtime`]: crate::Error::Runtime
    pub fn start(&self) -> Result<()> {
        let handle = Handle::try_current()?;
        let mut task = self.inner.task.lock();

        let started = self.inner.shared.update(|clock| {
            let was_running = clock.is_running();
            clock.start();
            !was_running && clock.is_running()
        });

        if started {
            log::debug!("Starting match clock");

            // Replaces (and cancels) a task that is about to exit.
            *task = Some(TickTask::spawn(
                &handle,
                self.inner.shared.clone(),
                self.inner.period,
            ));
        }

        Ok(())
    }

    pub fn stop(&self) {
        self.cancel_task();
        self.inner.shared.update(Clock::stop);
    }

    pub fn toggle(&self) -> Result<()> {
        if self.snapshot().is_running() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    pub fn reset(&self) {
        self.cancel_task();
        self.inner.shared.update(Clock::reset);
    }

    fn cancel_task(&self) {
        if let Some(task) = self.inner.task.lock().take() {
            task.cancel();
        }
    }
}

impl Shared {
    /// Applies `f` on the clock and publishes the new state.
    fn update<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Clock) -> T,
    {
        let mut clock = self.clock.lock();
        let res = f(&mut clock);
        self.tx.send_replace(*clock);
        res
    }
}

#[derive(Debug)]
struct TickTask {
    handle: JoinHandle<()>,
    shared: Arc<Shared>,
    cancelled: Arc<AtomicBool>,
}

impl TickTask {
    fn spawn(runtime: &Handle, shared: Arc<Shared>, period: Duration) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));

        let handle = runtime.spawn(run(shared.clone(), cancelled.clone(), period));

        Self {
            handle,
            shared,
            cancelled,
        }
    }

    fn cancel(&self) {
        // The tick task checks the flag while holding the clock lock. Once the flag is set
        // under the same lock no further tick can be applied.
        {
            let _clock = self.shared.clock.lock();
            self.cancelled.store(true, Ordering::Release);
        }

        self.handle.abort();
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run(shared: Arc<Shared>, cancelled: Arc<AtomicBool>, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        let mut clock = shared.clock.lock();
        if cancelled.load(Ordering::Acquire) {
            return;
        }

        match clock.tick() {
            Tick::Idle => return,
            Tick::Decremented => {
                shared.tx.send_replace(*clock);
            }
            Tick::Expired => {
                shared.tx.send_replace(*clock);
                log::debug!("Match clock expired");
                return;
            }
        }
    }
}
