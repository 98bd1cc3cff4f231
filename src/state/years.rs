//! Year count input and its conversion to a duration

use serde_json::Value;

use crate::error::CountdownError;

/// Average calendar year length, leap years included
pub const DAYS_PER_YEAR: f64 = 365.2425;
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Convert a year count to milliseconds using the average year length
pub fn years_to_ms(years: f64) -> f64 {
    years * DAYS_PER_YEAR * MS_PER_DAY
}

/// A validated, finite, non-negative year count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Years(f64);

impl Years {
    /// Largest accepted count; keeps end dates inside the calendar range
    pub const MAX: f64 = 200_000.0;

    pub fn new(years: f64) -> Result<Self, CountdownError> {
        if !years.is_finite() || years < 0.0 {
            return Err(CountdownError::InvalidYears {
                input: years.to_string(),
            });
        }
        if years > Self::MAX {
            return Err(CountdownError::YearsOutOfRange {
                years,
                max: Self::MAX,
            });
        }
        Ok(Self(years))
    }

    /// Parse a year count typed into a text field
    pub fn parse(input: &str) -> Result<Self, CountdownError> {
        let trimmed = input.trim();
        let years = trimmed
            .parse::<f64>()
            .map_err(|_| CountdownError::InvalidYears {
                input: input.to_string(),
            })?;
        Self::new(years)
    }

    /// Accept either a JSON number or a numeric string
    pub fn from_json(value: &Value) -> Result<Self, CountdownError> {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(years) => Self::new(years),
                None => Err(CountdownError::InvalidYears {
                    input: n.to_string(),
                }),
            },
            Value::String(s) => Self::parse(s),
            other => Err(CountdownError::InvalidYears {
                input: other.to_string(),
            }),
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Total countdown length in whole milliseconds
    pub fn to_duration_ms(self) -> i64 {
        // Bounded by MAX, so the cast cannot saturate
        years_to_ms(self.0).round() as i64
    }
}
