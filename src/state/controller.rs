//! Countdown controller: the single owner of countdown state and its ticker

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{CountdownState, DisplaySnapshot, Years};
use crate::{
    error::CountdownError,
    services::{Clock, StateStore},
    tasks::spawn_ticker,
};

/// What the ticker should do after a scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

#[derive(Debug)]
struct ActiveTicker {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct Inner {
    state: CountdownState,
    ticker: Option<ActiveTicker>,
    generation: u64,
}

impl Inner {
    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!("Cancelling ticker generation {}", ticker.generation);
            ticker.handle.abort();
        }
    }
}

/// Owns the countdown record, persists it, and publishes display snapshots.
///
/// At most one ticker task is outstanding per controller; every operation that
/// changes the countdown cancels the current ticker before doing anything else.
pub struct CountdownController {
    inner: Mutex<Inner>,
    store: StateStore,
    clock: Arc<dyn Clock>,
    snapshot_tx: watch::Sender<DisplaySnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<DisplaySnapshot>,
}

impl CountdownController {
    /// Create an idle controller; call [`resume`](Self::resume) to pick up saved state
    pub fn new(store: StateStore, clock: Arc<dyn Clock>) -> Arc<Self> {
        let (snapshot_tx, snapshot_rx) = watch::channel(DisplaySnapshot::idle(None));
        Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            store,
            clock,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, CountdownError> {
        self.inner
            .lock()
            .map_err(|e| CountdownError::Lock(e.to_string()))
    }

    /// Write the record while the caller holds the lock, so writes land in operation order
    fn persist(&self, state: &CountdownState) {
        if let Err(e) = self.store.save(state) {
            warn!("Failed to persist countdown state: {:#}", e);
        }
    }

    fn publish(&self, snapshot: DisplaySnapshot) -> DisplaySnapshot {
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    fn start_ticker(self: &Arc<Self>, inner: &mut Inner) {
        inner.cancel_ticker();
        inner.generation = inner.generation.wrapping_add(1);
        let generation = inner.generation;
        let handle = spawn_ticker(Arc::downgrade(self), generation);
        inner.ticker = Some(ActiveTicker { generation, handle });
        debug!("Started ticker generation {}", generation);
    }

    /// Start a new countdown, discarding any running one
    pub fn start(self: &Arc<Self>, years: Years) -> Result<DisplaySnapshot, CountdownError> {
        let mut inner = self.lock()?;
        inner.cancel_ticker();

        let now = self.clock.now_ms();
        let state = CountdownState::started(years, now).ok_or(CountdownError::YearsOutOfRange {
            years: years.value(),
            max: Years::MAX,
        })?;
        inner.state = state;
        self.persist(&inner.state);
        info!("Countdown started for {} years", years.value());

        let snapshot = self.tick_locked(&mut inner, now);
        if inner.state.active {
            self.start_ticker(&mut inner);
        }
        Ok(snapshot.unwrap_or_else(|| self.snapshot()))
    }

    /// Recompute the snapshot now.
    ///
    /// Returns `None` while idle. The tick that first observes expiry stops the
    /// ticker and marks the record inactive; later ticks change nothing.
    pub fn tick(&self) -> Result<Option<DisplaySnapshot>, CountdownError> {
        let mut inner = self.lock()?;
        let now = self.clock.now_ms();
        Ok(self.tick_locked(&mut inner, now))
    }

    /// Tick on behalf of the ticker task with the given generation
    pub fn scheduled_tick(&self, generation: u64) -> Result<TickOutcome, CountdownError> {
        let mut inner = self.lock()?;
        let owned = inner
            .ticker
            .as_ref()
            .map_or(false, |t| t.generation == generation);
        if !owned {
            debug!("Ignoring tick from stale ticker generation {}", generation);
            return Ok(TickOutcome::Stop);
        }

        let now = self.clock.now_ms();
        self.tick_locked(&mut inner, now);
        Ok(if inner.state.active {
            TickOutcome::Continue
        } else {
            TickOutcome::Stop
        })
    }

    fn tick_locked(&self, inner: &mut Inner, now: i64) -> Option<DisplaySnapshot> {
        let timing = inner.state.active_timing()?;
        let snapshot = DisplaySnapshot::compute(&timing, inner.state.years, now);

        if timing.has_ended(now) {
            inner.cancel_ticker();
            inner.state.active = false;
            self.persist(&inner.state);
            info!("Countdown ended");
        }
        Some(self.publish(snapshot))
    }

    /// Clear the countdown back to `{active: false}`
    pub fn reset(&self) -> Result<DisplaySnapshot, CountdownError> {
        let mut inner = self.lock()?;
        inner.cancel_ticker();
        inner.state = CountdownState::idle();
        self.persist(&inner.state);
        info!("Countdown reset");
        Ok(self.publish(DisplaySnapshot::idle(None)))
    }

    /// Pick up the persisted countdown after a restart
    pub fn resume(self: &Arc<Self>) -> Result<DisplaySnapshot, CountdownError> {
        let mut inner = self.lock()?;
        inner.cancel_ticker();
        inner.state = self.store.load();

        let Some(timing) = inner.state.active_timing() else {
            debug!("No active countdown to resume");
            return Ok(self.publish(DisplaySnapshot::idle(inner.state.years)));
        };

        let now = self.clock.now_ms();
        let snapshot = DisplaySnapshot::compute(&timing, inner.state.years, now);
        if timing.has_ended(now) {
            inner.state.active = false;
            self.persist(&inner.state);
            info!("Saved countdown ended while stopped");
        } else {
            self.start_ticker(&mut inner);
            info!("Resumed countdown, {} remaining", snapshot.remaining_text);
        }
        Ok(self.publish(snapshot))
    }

    /// Cancel the ticker without touching the record
    pub fn shutdown(&self) -> Result<(), CountdownError> {
        self.lock()?.cancel_ticker();
        Ok(())
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn state(&self) -> Result<CountdownState, CountdownError> {
        Ok(self.lock()?.state.clone())
    }

    pub fn is_ticking(&self) -> Result<bool, CountdownError> {
        Ok(self.lock()?.ticker.is_some())
    }
}
