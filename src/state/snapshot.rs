//! Display snapshot derived from the countdown record and the clock

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::countdown_state::Timing;

pub const STATUS_IDLE: &str = "Enter years and press Start";
pub const STATUS_RUNNING: &str = "Counting down";
pub const STATUS_ENDED: &str = "The period has ended";

const IDLE_REMAINING: &str = "--:--:--:--";
const ZERO_REMAINING: &str = "00:00:00:00";
const NO_END_DATE: &str = "—";
const END_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which of the three displays is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// Everything the rendering layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySnapshot {
    pub phase: Phase,
    pub remaining_ms: Option<i64>,
    pub remaining_text: String,
    pub progress_fraction: f64,
    pub percent_text: String,
    pub angle_degrees: f64,
    pub ends_at: Option<DateTime<Utc>>,
    pub end_date_text: String,
    pub status_text: String,
    /// Last entered year count, for pre-filling the input
    pub years: Option<f64>,
}

impl DisplaySnapshot {
    /// Placeholder shown when no countdown is running
    pub fn idle(years: Option<f64>) -> Self {
        Self {
            phase: Phase::Idle,
            remaining_ms: None,
            remaining_text: IDLE_REMAINING.to_string(),
            progress_fraction: 0.0,
            percent_text: percent_text(0.0),
            angle_degrees: 0.0,
            ends_at: None,
            end_date_text: NO_END_DATE.to_string(),
            status_text: STATUS_IDLE.to_string(),
            years,
        }
    }

    /// Snapshot of `timing` as seen at `now_ms`
    pub fn compute(timing: &Timing, years: Option<f64>, now_ms: i64) -> Self {
        let remaining = timing.remaining_ms(now_ms);
        let fraction = progress_fraction(timing.total_ms, remaining);
        let ends_at = Utc.timestamp_millis_opt(timing.ends_at).single();
        let (phase, status) = if remaining > 0 {
            (Phase::Running, STATUS_RUNNING)
        } else {
            (Phase::Ended, STATUS_ENDED)
        };

        Self {
            phase,
            remaining_ms: Some(remaining),
            remaining_text: format_remaining(remaining),
            progress_fraction: fraction,
            percent_text: percent_text(fraction),
            angle_degrees: progress_angle(fraction),
            ends_at,
            end_date_text: ends_at
                .map(|at| at.with_timezone(&Local).format(END_DATE_FORMAT).to_string())
                .unwrap_or_else(|| NO_END_DATE.to_string()),
            status_text: status.to_string(),
            years,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }
}

/// Render remaining time as `DD:HH:MM:SS`, truncating partial seconds.
///
/// The day field grows past two digits for long countdowns.
pub fn format_remaining(remaining_ms: i64) -> String {
    if remaining_ms <= 0 {
        return ZERO_REMAINING.to_string();
    }
    let total_seconds = remaining_ms / 1000;
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Elapsed share of the countdown in `[0, 1]`; a zero-length countdown is complete
pub fn progress_fraction(total_ms: i64, remaining_ms: i64) -> f64 {
    if total_ms <= 0 {
        return 1.0;
    }
    let elapsed = total_ms.saturating_sub(remaining_ms).max(0);
    (elapsed as f64 / total_ms as f64).clamp(0.0, 1.0)
}

/// Angle of the circular progress indicator
pub fn progress_angle(fraction: f64) -> f64 {
    (fraction * 360.0).clamp(0.0, 360.0)
}

fn percent_text(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as u32)
}
