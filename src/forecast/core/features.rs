//! Harmonic design-matrix construction from calendar day indices.
//!
//! Purpose
//! -------
//! Turn a timestamp column into the fixed (non-learned) harmonic basis the
//! regression family consumes: a constant column followed by sine/cosine
//! pairs at the yearly, monthly, and weekly cycles.
//!
//! Key behaviors
//! -------------
//! - Each cycle contributes `2 · order` columns: `sin(i·2π·d/f)` and
//!   `cos(i·2π·d/f)` for harmonic orders `i = 1..=order`, where `d` is the
//!   cycle's day index and `f` its period.
//! - Column order is fixed and deterministic: constant, then all yearly
//!   pairs, then monthly, then weekly — `1 + 2·(Y + M + W)` columns total.
//! - Every column carries a structured [`FeatureTag`]; downstream code
//!   groups coefficients by tag rather than by name matching, so the
//!   fit-time layout can be compared for identity at predict/decompose time.
//!
//! Invariants & assumptions
//! ------------------------
//! - Day indices are 0-based: weekday 0–6 (Monday = 0), day-of-month 0–30,
//!   day-of-year 0–365.
//! - Cycle periods are 366 (leap-year day count), 31, and 7; the same
//!   periods are used by the seasonality decomposer, which reads them off
//!   [`CycleKind::period`].
//! - Construction is a pure function of the input series: no side effects,
//!   no mutation of the caller's data, identical output for identical input.
use crate::forecast::{
    core::series::TimeSeries,
    errors::{ForecastError, ForecastResult},
};
use chrono::{Datelike, NaiveDateTime};
use ndarray::Array2;
use std::f64::consts::PI;

/// Calendar cycle a harmonic column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    Yearly,
    Monthly,
    Weekly,
}

impl CycleKind {
    /// All cycles in design-matrix column order.
    pub const ALL: [CycleKind; 3] = [CycleKind::Yearly, CycleKind::Monthly, CycleKind::Weekly];

    /// Cycle period used in the harmonic phase, shared with the decomposer.
    pub fn period(&self) -> f64 {
        match self {
            CycleKind::Yearly => 366.0,
            CycleKind::Monthly => 31.0,
            CycleKind::Weekly => 7.0,
        }
    }

    /// Number of distinct day indices the cycle ranges over.
    pub fn day_count(&self) -> usize {
        match self {
            CycleKind::Yearly => 366,
            CycleKind::Monthly => 31,
            CycleKind::Weekly => 7,
        }
    }

    /// Lower-case cycle label used in column names and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            CycleKind::Yearly => "yearly",
            CycleKind::Monthly => "monthly",
            CycleKind::Weekly => "weekly",
        }
    }

    /// Column header of the decomposed-curve day index for this cycle.
    pub fn day_header(&self) -> &'static str {
        match self {
            CycleKind::Yearly => "Yearday",
            CycleKind::Monthly => "Monthday",
            CycleKind::Weekly => "Weekday",
        }
    }

    /// 0-based day index of `t` within this cycle (Monday = 0 for weeks).
    pub fn day_index(&self, t: &NaiveDateTime) -> f64 {
        match self {
            CycleKind::Yearly => (t.ordinal() - 1) as f64,
            CycleKind::Monthly => (t.day() - 1) as f64,
            CycleKind::Weekly => t.weekday().num_days_from_monday() as f64,
        }
    }
}

/// Sine or cosine half of a harmonic pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sin,
    Cos,
}

/// Structured identity of one design-matrix column.
///
/// Generated at feature-construction time and snapshotted by the fitted
/// model; coefficient-to-feature matching goes through these tags instead of
/// name substrings, so a layout drift between fit and predict is detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureTag {
    /// The all-ones intercept column.
    Constant,
    /// A harmonic column at `cycle`, integer `order` ≥ 1, and `phase`.
    Harmonic { cycle: CycleKind, order: usize, phase: Phase },
}

impl FeatureTag {
    /// Human-readable column name, e.g. `"yearly_sin_3"` or `"const"`.
    pub fn name(&self) -> String {
        match self {
            FeatureTag::Constant => "const".to_string(),
            FeatureTag::Harmonic { cycle, order, phase } => {
                let phase_label = match phase {
                    Phase::Sin => "sin",
                    Phase::Cos => "cos",
                };
                format!("{}_{}_{}", cycle.label(), phase_label, order)
            }
        }
    }
}

/// Harmonic design matrix with its ordered column layout.
///
/// Fields
/// ------
/// - `features`: `n × (1 + 2·(Y + M + W))` matrix, row-aligned with the
///   source series.
/// - `layout`: one [`FeatureTag`] per column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    pub features: Array2<f64>,
    pub layout: Vec<FeatureTag>,
}

impl DesignMatrix {
    /// Build the harmonic design matrix for a series.
    ///
    /// ## Steps
    /// 1. Emit the constant 1.0 column (the intercept is fitted through the
    ///    coefficient vector, not a separate bias term).
    /// 2. For each cycle (yearly, monthly, weekly) and harmonic order
    ///    `i = 1..=order`: compute `phase = i·2π·day_index/period` per row
    ///    and emit the sine column followed by the cosine column.
    ///
    /// # Errors
    /// - [`ForecastError::InvalidOrder`] if any order is zero.
    pub fn build(
        series: &TimeSeries, year_order: usize, month_order: usize, week_order: usize,
    ) -> ForecastResult<DesignMatrix> {
        let orders = [year_order, month_order, week_order];
        for (cycle, &order) in CycleKind::ALL.iter().zip(orders.iter()) {
            if order == 0 {
                return Err(ForecastError::InvalidOrder { cycle: cycle.label(), order });
            }
        }

        let n = series.len();
        let width = 1 + 2 * (year_order + month_order + week_order);
        let mut features = Array2::zeros((n, width));
        let mut layout = Vec::with_capacity(width);

        features.column_mut(0).fill(1.0);
        layout.push(FeatureTag::Constant);

        let mut col = 1;
        for (cycle, &order) in CycleKind::ALL.iter().zip(orders.iter()) {
            let period = cycle.period();
            for harmonic in 1..=order {
                for (row, t) in series.timestamps.iter().enumerate() {
                    let position = harmonic as f64 * 2.0 * PI * cycle.day_index(t) / period;
                    features[[row, col]] = position.sin();
                    features[[row, col + 1]] = position.cos();
                }
                layout.push(FeatureTag::Harmonic { cycle: *cycle, order: harmonic, phase: Phase::Sin });
                layout.push(FeatureTag::Harmonic { cycle: *cycle, order: harmonic, phase: Phase::Cos });
                col += 2;
            }
        }

        Ok(DesignMatrix { features, layout })
    }

    /// Number of feature columns.
    pub fn width(&self) -> usize {
        self.layout.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column count, bounds, and row alignment of the built matrix.
    // - Determinism of the column order across repeated builds.
    // - Day-index conventions (Monday = 0, 0-based month/year days).
    // - The tag layout emitted alongside the features.
    //
    // They intentionally DO NOT cover:
    // - Coefficient grouping by tag; that lives with the decomposer tests.
    // -------------------------------------------------------------------------

    fn daily_series(days: usize) -> TimeSeries {
        // 2024-01-01 is a Monday, which pins the weekday convention below.
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let timestamps: Vec<NaiveDateTime> =
            (0..days).map(|d| start + Duration::days(d as i64)).collect();
        TimeSeries::new(timestamps, Array1::zeros(days)).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the column-count formula and row alignment.
    //
    // Given
    // -----
    // - 40 daily rows with orders (2, 3, 1).
    //
    // Expect
    // ------
    // - 1 + 2·(2 + 3 + 1) = 13 columns, 40 rows, and a layout of the same
    //   width.
    fn build_emits_expected_shape() {
        let series = daily_series(40);
        let design = DesignMatrix::build(&series, 2, 3, 1).unwrap();
        assert_eq!(design.features.dim(), (40, 13));
        assert_eq!(design.width(), 13);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the constant column is all ones and every harmonic column stays
    // within [-1, 1].
    //
    // Given
    // -----
    // - 366 daily rows (a full leap year) with orders (3, 2, 2).
    //
    // Expect
    // ------
    // - Column 0 identically 1.0; all other entries bounded by 1 in absolute
    //   value.
    fn columns_are_bounded() {
        let series = daily_series(366);
        let design = DesignMatrix::build(&series, 3, 2, 2).unwrap();
        for &value in design.features.column(0).iter() {
            assert_eq!(value, 1.0);
        }
        for col in 1..design.width() {
            for &value in design.features.column(col).iter() {
                assert!(value.abs() <= 1.0 + 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check that feature construction is deterministic: identical input
    // yields identical output, bit for bit.
    //
    // Given
    // -----
    // - The same 50-row series built twice with orders (1, 1, 1).
    //
    // Expect
    // ------
    // - Equal feature matrices and equal layouts.
    fn build_is_deterministic() {
        let series = daily_series(50);
        let first = DesignMatrix::build(&series, 1, 1, 1).unwrap();
        let second = DesignMatrix::build(&series, 1, 1, 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // Pin the layout ordering and naming convention.
    //
    // Given
    // -----
    // - Orders (1, 1, 2).
    //
    // Expect
    // ------
    // - Tags in order: const, yearly sin/cos 1, monthly sin/cos 1, weekly
    //   sin/cos 1, weekly sin/cos 2; names match the `cycle_phase_order`
    //   scheme.
    fn layout_order_is_fixed() {
        let series = daily_series(10);
        let design = DesignMatrix::build(&series, 1, 1, 2).unwrap();
        let names: Vec<String> = design.layout.iter().map(FeatureTag::name).collect();
        assert_eq!(
            names,
            vec![
                "const",
                "yearly_sin_1",
                "yearly_cos_1",
                "monthly_sin_1",
                "monthly_cos_1",
                "weekly_sin_1",
                "weekly_cos_1",
                "weekly_sin_2",
                "weekly_cos_2",
            ]
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the day-index conventions on a known date.
    //
    // Given
    // -----
    // - 2024-01-01 (a Monday, first day of month and year).
    //
    // Expect
    // ------
    // - Weekly, monthly, and yearly day indices all 0, so every sine column
    //   is 0 and every cosine column is 1 in the first row.
    fn day_indices_start_at_zero() {
        let series = daily_series(8);
        let monday = &series.timestamps[0];
        assert_eq!(CycleKind::Weekly.day_index(monday), 0.0);
        assert_eq!(CycleKind::Monthly.day_index(monday), 0.0);
        assert_eq!(CycleKind::Yearly.day_index(monday), 0.0);

        let design = DesignMatrix::build(&series, 1, 1, 1).unwrap();
        for (col, tag) in design.layout.iter().enumerate() {
            if let FeatureTag::Harmonic { phase, .. } = tag {
                let expected = match phase {
                    Phase::Sin => 0.0,
                    Phase::Cos => 1.0,
                };
                assert!((design.features[[0, col]] - expected).abs() < 1e-12);
            }
        }
        // Sunday of the same week is day index 6.
        assert_eq!(CycleKind::Weekly.day_index(&series.timestamps[6]), 6.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure zero harmonic orders are rejected with the offending cycle.
    //
    // Given
    // -----
    // - Orders (1, 1, 0).
    //
    // Expect
    // ------
    // - `InvalidOrder { cycle: "weekly", order: 0 }`.
    fn build_rejects_zero_order() {
        let series = daily_series(5);
        assert_eq!(
            DesignMatrix::build(&series, 1, 1, 0).unwrap_err(),
            ForecastError::InvalidOrder { cycle: "weekly", order: 0 }
        );
    }
}
