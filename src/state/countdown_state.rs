//! Persisted countdown record

use serde::{Deserialize, Serialize};

use super::years::Years;

/// The single persisted countdown record.
///
/// Fields other than `active` are absent until a countdown has been started.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownState {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<i64>,
}

/// Absolute timing of a started countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub total_ms: i64,
    pub started_at: i64,
    pub ends_at: i64,
}

impl Timing {
    /// Milliseconds left at `now_ms`, never negative
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        self.ends_at.saturating_sub(now_ms).max(0)
    }

    pub fn has_ended(&self, now_ms: i64) -> bool {
        self.remaining_ms(now_ms) <= 0
    }
}

impl CountdownState {
    /// The cleared record: `{active: false}`
    pub fn idle() -> Self {
        Self::default()
    }

    /// A fresh running record started at `now_ms`.
    ///
    /// Returns `None` if the end timestamp would overflow.
    pub fn started(years: Years, now_ms: i64) -> Option<Self> {
        let total_ms = years.to_duration_ms();
        let ends_at = now_ms.checked_add(total_ms)?;
        Some(Self {
            active: true,
            years: Some(years.value()),
            total_ms: Some(total_ms),
            started_at: Some(now_ms),
            ends_at: Some(ends_at),
        })
    }

    /// Timing fields, if all present and consistent
    pub fn timing(&self) -> Option<Timing> {
        let total_ms = self.total_ms?;
        let started_at = self.started_at?;
        let ends_at = self.ends_at?;
        if total_ms < 0 || started_at.checked_add(total_ms) != Some(ends_at) {
            return None;
        }
        Some(Timing {
            total_ms,
            started_at,
            ends_at,
        })
    }

    /// Timing of a countdown that is still marked active
    pub fn active_timing(&self) -> Option<Timing> {
        if self.active {
            self.timing()
        } else {
            None
        }
    }

    /// Whether the record can be trusted after loading it from storage
    pub fn is_consistent(&self) -> bool {
        let years_ok = self.years.map_or(true, |y| y.is_finite() && y >= 0.0);
        years_ok && (!self.active || self.timing().is_some())
    }
}
