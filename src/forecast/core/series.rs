//! Observation series containers and future-frame extension.
//!
//! Purpose
//! -------
//! Provide the validated container for timestamped observations that every
//! other component consumes, plus the calendar-aware extension used to build
//! forecast horizons.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] enforces basic invariants at construction: non-empty,
//!   row-aligned columns, strictly increasing timestamps, and no infinite
//!   targets. NaN targets are allowed and mark unknown (future) values.
//! - [`TimeSeries::extend_future`] appends `periods` rows after the last
//!   historical timestamp at a calendar [`Frequency`], filling targets with
//!   NaN, optionally keeping the history.
//!
//! Invariants & assumptions
//! ------------------------
//! - Timestamps strictly increase; this is required for the future-frame
//!   anchor (the historical maximum is simply the last row) and validated
//!   here rather than assumed.
//! - The container never mutates after construction; extension produces a
//!   fresh, revalidated series.
//!
//! Conventions
//! -----------
//! - Timestamps are naive date-times; time-zone handling is upstream I/O
//!   territory and out of scope.
//! - Frequencies parse from the conventional one-letter codes
//!   (`"H"`, `"D"`, `"W"`, `"M"`), case-insensitive.
use crate::forecast::errors::{ForecastError, ForecastResult};
use chrono::{Duration, Months, NaiveDateTime};
use ndarray::Array1;
use std::str::FromStr;

/// Calendar step used when extending a series into the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// The timestamp one step after `t`.
    ///
    /// Monthly steps are calendar-aware (end-of-month clamping follows the
    /// underlying date arithmetic); the other steps are fixed spans.
    ///
    /// # Errors
    /// - [`ForecastError::TimestampOutOfRange`] if the step leaves the
    ///   representable date range.
    fn advance(&self, t: NaiveDateTime) -> ForecastResult<NaiveDateTime> {
        let next = match self {
            Frequency::Hourly => t.checked_add_signed(Duration::hours(1)),
            Frequency::Daily => t.checked_add_signed(Duration::days(1)),
            Frequency::Weekly => t.checked_add_signed(Duration::weeks(1)),
            Frequency::Monthly => t.checked_add_months(Months::new(1)),
        };
        next.ok_or(ForecastError::TimestampOutOfRange { periods: 1 })
    }
}

impl FromStr for Frequency {
    type Err = ForecastError;

    /// Parse a frequency code (case-insensitive): `"H"`, `"D"`, `"W"`, `"M"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h" => Ok(Frequency::Hourly),
            "d" => Ok(Frequency::Daily),
            "w" => Ok(Frequency::Weekly),
            "m" => Ok(Frequency::Monthly),
            _ => Err(ForecastError::InvalidFrequency {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'H', 'D', 'W' or 'M'.",
            }),
        }
    }
}

/// Validated, row-aligned series of (timestamp, target) observations.
///
/// Fields
/// ------
/// - `timestamps`: strictly increasing naive date-times.
/// - `values`: target values; finite numbers, or NaN for unknown rows.
///
/// Invariants
/// ----------
/// - `timestamps.len() == values.len() > 0`.
/// - `timestamps[i] < timestamps[i + 1]` for every consecutive pair.
/// - No value is ±∞.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Observation timestamps (strictly increasing).
    pub timestamps: Vec<NaiveDateTime>,
    /// Target values; NaN marks an unknown (future) target.
    pub values: Array1<f64>,
}

impl TimeSeries {
    /// Construct a validated [`TimeSeries`].
    ///
    /// # Errors
    /// - [`ForecastError::EmptySeries`] when there are no rows.
    /// - [`ForecastError::LengthMismatch`] when the columns differ in length.
    /// - [`ForecastError::NonMonotonicTimestamps`] at the first index whose
    ///   timestamp is not strictly greater than its predecessor.
    /// - [`ForecastError::InfiniteTarget`] at the first infinite value.
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Array1<f64>) -> ForecastResult<Self> {
        if timestamps.is_empty() {
            return Err(ForecastError::EmptySeries);
        }
        if timestamps.len() != values.len() {
            return Err(ForecastError::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        for index in 1..timestamps.len() {
            if timestamps[index] <= timestamps[index - 1] {
                return Err(ForecastError::NonMonotonicTimestamps { index });
            }
        }
        for (index, &value) in values.iter().enumerate() {
            if value.is_infinite() {
                return Err(ForecastError::InfiniteTarget { index, value });
            }
        }
        Ok(TimeSeries { timestamps, values })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the series has no rows. Always `false` for a constructed
    /// series; provided for the conventional pairing with [`len`].
    ///
    /// [`len`]: TimeSeries::len
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Reject any unknown (NaN) target; used before fitting.
    ///
    /// # Errors
    /// - [`ForecastError::MissingTarget`] at the first NaN row.
    pub fn require_observed(&self) -> ForecastResult<()> {
        for (index, &value) in self.values.iter().enumerate() {
            if value.is_nan() {
                return Err(ForecastError::MissingTarget { index });
            }
        }
        Ok(())
    }

    /// Extend the series `periods` steps past its last timestamp.
    ///
    /// ## Behavior
    /// 1. Anchor at the historical maximum timestamp (the last row).
    /// 2. Generate `periods` timestamps at the given frequency, starting one
    ///    step *after* the anchor (the anchor itself is never repeated).
    /// 3. Fill the new targets with NaN.
    /// 4. Prepend the history when `include_history` is set.
    ///
    /// The result is revalidated through [`TimeSeries::new`], so the
    /// chronological-order invariant carries over to the output.
    ///
    /// # Errors
    /// - [`ForecastError::InvalidHorizon`] when `periods` is zero.
    /// - [`ForecastError::TimestampOutOfRange`] if a step overflows the
    ///   representable date range.
    pub fn extend_future(
        &self, periods: usize, frequency: Frequency, include_history: bool,
    ) -> ForecastResult<TimeSeries> {
        if periods == 0 {
            return Err(ForecastError::InvalidHorizon { periods });
        }
        let mut timestamps = Vec::with_capacity(periods + if include_history { self.len() } else { 0 });
        let mut values = Vec::with_capacity(timestamps.capacity());
        if include_history {
            timestamps.extend_from_slice(&self.timestamps);
            values.extend(self.values.iter().copied());
        }
        let mut cursor = self.timestamps[self.len() - 1];
        for _ in 0..periods {
            cursor = frequency
                .advance(cursor)
                .map_err(|_| ForecastError::TimestampOutOfRange { periods })?;
            timestamps.push(cursor);
            values.push(f64::NAN);
        }
        TimeSeries::new(timestamps, Array1::from(values))
    }
}
