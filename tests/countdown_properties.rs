// Property-based tests for the countdown arithmetic and tick invariants

use std::sync::Arc;

use proptest::prelude::*;

use life_clock::{
    services::{ManualClock, MemoryStorage, StateStore},
    state::years_to_ms,
    CountdownController, Years,
};

const T0: i64 = 1_700_000_000_000;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    /// Property: the duration is the year count times the average year length
    #[test]
    fn prop_duration_uses_average_year(years in 0.0..=Years::MAX) {
        let expected = years * 365.2425 * 86_400_000.0;
        let actual = years_to_ms(years);
        prop_assert!((actual - expected).abs() <= expected.abs() * 1e-12 + 1e-6);

        let whole_ms = Years::new(years).unwrap().to_duration_ms();
        prop_assert!((whole_ms as f64 - expected).abs() <= 1.0);
    }

    /// Property: end time stays fixed and progress never goes backwards across ticks
    #[test]
    fn prop_ticks_keep_end_time_and_progress_monotonic(
        years in 0.0..=Years::MAX,
        steps in prop::collection::vec(0i64..5_000_000_000_000i64, 1..40),
    ) {
        let rt = runtime();
        let _guard = rt.enter();

        let clock = Arc::new(ManualClock::new(T0));
        let controller = CountdownController::new(
            StateStore::with_default_key(Arc::new(MemoryStorage::new())),
            clock.clone(),
        );
        let started = controller.start(Years::new(years).unwrap()).unwrap();
        let initial = controller.state().unwrap();
        let ends_at = initial.ends_at.unwrap();
        prop_assert_eq!(Some(ends_at), initial.started_at.zip(initial.total_ms).map(|(s, t)| s + t));

        let mut last_fraction = started.progress_fraction;
        let mut last_remaining = started.remaining_ms.unwrap();
        for step in steps {
            clock.advance(step);
            let snapshot = controller
                .tick()
                .unwrap()
                .unwrap_or_else(|| controller.snapshot());

            let state = controller.state().unwrap();
            prop_assert_eq!(state.ends_at, Some(ends_at));
            prop_assert_eq!(state.started_at, initial.started_at);
            prop_assert_eq!(state.total_ms, initial.total_ms);

            prop_assert!(snapshot.progress_fraction >= last_fraction);
            prop_assert!((0.0..=1.0).contains(&snapshot.progress_fraction));
            let remaining = snapshot.remaining_ms.unwrap();
            prop_assert!(remaining <= last_remaining);
            last_fraction = snapshot.progress_fraction;
            last_remaining = remaining;
        }

        controller.shutdown().unwrap();
    }
}
