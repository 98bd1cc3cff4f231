//! Periodic countdown tick task

use std::{sync::Weak, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::state::{CountdownController, TickOutcome};

/// Period between display recomputations
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn the ticker for one countdown.
///
/// The first tick fires one period after spawning; the caller has already
/// produced the immediate snapshot.
pub fn spawn_ticker(controller: Weak<CountdownController>, generation: u64) -> JoinHandle<()> {
    tokio::spawn(ticker_task(controller, generation))
}

async fn ticker_task(controller: Weak<CountdownController>, generation: u64) {
    debug!("Starting ticker task generation {}", generation);

    let mut interval = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(controller) = controller.upgrade() else {
            debug!("Controller dropped, stopping ticker generation {}", generation);
            break;
        };

        match controller.scheduled_tick(generation) {
            Ok(TickOutcome::Continue) => {}
            Ok(TickOutcome::Stop) => {
                debug!("Ticker generation {} finished", generation);
                break;
            }
            Err(e) => {
                error!("Countdown tick failed: {}", e);
                break;
            }
        }
    }
}
