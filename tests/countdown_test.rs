// Integration tests for countdown persistence, resume and the ticker
use std::{sync::Arc, time::Duration};

use life_clock::{
    services::{Clock, FileStorage, ManualClock, MemoryStorage, StateStore, Storage, DEFAULT_STORAGE_KEY},
    state::{snapshot::STATUS_ENDED, CountdownController, CountdownState, DisplaySnapshot, Phase},
    Years,
};

const T0: i64 = 1_700_000_000_000;
const ONE_YEAR_MS: i64 = 31_556_952_000;

/// Wall clock that follows tokio's (pausable) time
struct TokioClock {
    origin_ms: i64,
    origin: tokio::time::Instant,
}

impl TokioClock {
    fn new(origin_ms: i64) -> Self {
        Self {
            origin_ms,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        self.origin_ms + self.origin.elapsed().as_millis() as i64
    }
}

fn memory_controller(
    storage: &Arc<MemoryStorage>,
    clock: &Arc<ManualClock>,
) -> Arc<CountdownController> {
    CountdownController::new(
        StateStore::with_default_key(storage.clone()),
        clock.clone(),
    )
}

#[tokio::test]
async fn test_resume_mid_countdown_matches_uninterrupted_tick() {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(ManualClock::new(T0));

    let first = memory_controller(&storage, &clock);
    first.start(Years::new(1.0).unwrap()).unwrap();
    clock.advance(123_456_789);
    let uninterrupted = first.tick().unwrap().unwrap();
    first.shutdown().unwrap();

    let reloaded = memory_controller(&storage, &clock);
    let resumed = reloaded.resume().unwrap();

    assert_eq!(resumed, uninterrupted);
    assert_eq!(resumed.phase, Phase::Running);
    assert!(reloaded.is_ticking().unwrap());

    let state = reloaded.state().unwrap();
    assert_eq!(state.started_at, Some(T0));
    assert_eq!(state.ends_at, Some(T0 + ONE_YEAR_MS));
    assert_eq!(state.total_ms, Some(ONE_YEAR_MS));
}

#[tokio::test]
async fn test_resume_after_expiry_shows_final_snapshot() {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(ManualClock::new(T0));

    let first = memory_controller(&storage, &clock);
    first.start(Years::new(1.0).unwrap()).unwrap();
    first.shutdown().unwrap();
    clock.advance(ONE_YEAR_MS + 60_000);

    let reloaded = memory_controller(&storage, &clock);
    let writes_before = storage.write_count();
    let snapshot = reloaded.resume().unwrap();

    assert!(snapshot.is_ended());
    assert_eq!(snapshot.remaining_text, "00:00:00:00");
    assert_eq!(snapshot.percent_text, "100%");
    assert_eq!(snapshot.status_text, STATUS_ENDED);
    assert!(!reloaded.is_ticking().unwrap());
    assert!(!reloaded.state().unwrap().active);
    assert_eq!(storage.write_count(), writes_before + 1);

    // a second reload finds an inactive record and pre-fills the year count
    let again = memory_controller(&storage, &clock);
    assert_eq!(again.resume().unwrap(), DisplaySnapshot::idle(Some(1.0)));
}

#[tokio::test]
async fn test_reset_then_reload_is_idle() {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(ManualClock::new(T0));

    let first = memory_controller(&storage, &clock);
    first.start(Years::new(3.0).unwrap()).unwrap();
    clock.advance(5_000);
    first.reset().unwrap();

    let reloaded = memory_controller(&storage, &clock);
    let snapshot = reloaded.resume().unwrap();
    assert_eq!(snapshot, DisplaySnapshot::idle(None));
    assert_eq!(reloaded.state().unwrap(), CountdownState::idle());
    assert!(!reloaded.is_ticking().unwrap());
}

#[tokio::test]
async fn test_resume_with_corrupt_record_is_idle() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item(DEFAULT_STORAGE_KEY, "[1, 2").unwrap();
    let clock = Arc::new(ManualClock::new(T0));

    let controller = memory_controller(&storage, &clock);
    assert_eq!(controller.resume().unwrap(), DisplaySnapshot::idle(None));
    assert!(!controller.is_ticking().unwrap());
}

#[tokio::test]
async fn test_file_backed_countdown_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("life-clock.json");
    let clock = Arc::new(ManualClock::new(T0));

    let first = CountdownController::new(
        StateStore::with_default_key(Arc::new(FileStorage::new(&path))),
        clock.clone(),
    );
    first.start(Years::new(2.0).unwrap()).unwrap();
    first.shutdown().unwrap();
    clock.advance(86_400_000);

    let second = CountdownController::new(
        StateStore::with_default_key(Arc::new(FileStorage::new(&path))),
        clock.clone(),
    );
    let snapshot = second.resume().unwrap();
    assert_eq!(snapshot.phase, Phase::Running);
    assert_eq!(snapshot.years, Some(2.0));
    assert_eq!(second.state().unwrap().started_at, Some(T0));
    second.shutdown().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_ticker_publishes_and_stops_at_expiry() {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(TokioClock::new(T0));
    let controller = CountdownController::new(
        StateStore::with_default_key(storage.clone()),
        clock,
    );

    // roughly three seconds
    let years = Years::new(3_000.0 / 31_556_952_000.0).unwrap();
    let started = controller.start(years).unwrap();
    assert_eq!(started.remaining_text, "00:00:00:03");
    let mut rx = controller.subscribe();

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().remaining_text, "00:00:00:02");
    assert!(controller.is_ticking().unwrap());

    tokio::time::sleep(Duration::from_secs(5)).await;
    let last = controller.snapshot();
    assert!(last.is_ended());
    assert_eq!(last.progress_fraction, 1.0);
    assert!(!controller.is_ticking().unwrap());
    assert!(!controller.state().unwrap().active);
    // start and expiry are the only writes
    assert_eq!(storage.write_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_restart_keeps_a_single_ticker() {
    let storage = Arc::new(MemoryStorage::new());
    let clock = Arc::new(TokioClock::new(T0));
    let controller = CountdownController::new(
        StateStore::with_default_key(storage.clone()),
        clock,
    );

    controller.start(Years::new(1.0).unwrap()).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    controller.start(Years::new(1.0).unwrap()).unwrap();

    let mut rx = controller.subscribe();
    let mut updates = 0;
    let deadline = tokio::time::Instant::now() + Duration::from_millis(3_200);
    while tokio::time::timeout_at(deadline, rx.changed()).await.is_ok() {
        rx.borrow_and_update();
        updates += 1;
    }
    // one update per second from the surviving ticker only
    assert_eq!(updates, 3);
    assert!(controller.is_ticking().unwrap());
    assert_eq!(storage.write_count(), 2);
}
