//! Seasonality decomposition: fitted coefficients back into calendar curves.
//!
//! Purpose
//! -------
//! Reconstruct the learned per-harmonic coefficients into a named seasonal
//! curve per cycle — one value per weekday, month day, or year day —
//! independent of any trend.
//!
//! Key behaviors
//! -------------
//! - Coefficients are grouped by the structured [`FeatureTag`] attached to
//!   each design-matrix column at fit time, preserving column order; pair
//!   `i` (sine, cosine) corresponds to harmonic order `i`.
//! - The curve at day index `d` is
//!   `Σᵢ sinᵢ·sin(i·2π·d/f) + cosᵢ·cos(i·2π·d/f)` with the cycle period `f`
//!   taken from [`CycleKind::period`] — the same period the feature builder
//!   used, so fit and decomposition can never disagree on it.
//! - Day indices are reported 0-based Monday-first for the weekly cycle and
//!   1-based for the monthly and yearly cycles.
use crate::forecast::{
    core::features::{CycleKind, FeatureTag, Phase},
    errors::{ForecastError, ForecastResult},
};
use ndarray::Array1;
use std::f64::consts::PI;

/// Decomposed seasonal curve for one cycle.
///
/// Fields
/// ------
/// - `cycle`: which calendar cycle the curve describes.
/// - `day_indices`: full day range of the cycle (0-based for weekly,
///   1-based for monthly/yearly).
/// - `values`: decomposed seasonal effect per day index.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalCurve {
    pub cycle: CycleKind,
    pub day_indices: Vec<u32>,
    pub values: Array1<f64>,
}

impl SeasonalCurve {
    /// Peak-to-trough range of the curve.
    pub fn amplitude_range(&self) -> f64 {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in self.values.iter() {
            min = min.min(v);
            max = max.max(v);
        }
        max - min
    }
}

impl std::fmt::Display for SeasonalCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>8}  {:>12}", self.cycle.day_header(), "Value")?;
        for (day, value) in self.day_indices.iter().zip(self.values.iter()) {
            writeln!(f, "{day:>8}  {value:>12.6}")?;
        }
        Ok(())
    }
}

/// Rebuild the seasonal curve for `cycle` from a fitted coefficient vector.
///
/// Filters the coefficients whose tag belongs to `cycle` (column order
/// preserved), pairs them as (sine, cosine) per harmonic order, and sums the
/// harmonics over the cycle's full day range.
///
/// # Errors
/// - [`ForecastError::LayoutMismatch`] if `betas` and `layout` differ in
///   length.
/// - [`ForecastError::UnpairedHarmonic`] if the cycle's columns do not form
///   clean (sine, cosine) pairs in order — a drifted layout, not a
///   recoverable condition.
pub fn decompose(
    cycle: CycleKind, betas: &Array1<f64>, layout: &[FeatureTag],
) -> ForecastResult<SeasonalCurve> {
    if betas.len() != layout.len() {
        return Err(ForecastError::LayoutMismatch { expected: layout.len(), actual: betas.len() });
    }

    let mut tagged: Vec<(usize, Phase, f64)> = Vec::new();
    for (tag, &coef) in layout.iter().zip(betas.iter()) {
        if let FeatureTag::Harmonic { cycle: c, order, phase } = tag {
            if *c == cycle {
                tagged.push((*order, *phase, coef));
            }
        }
    }

    let mut pairs: Vec<(usize, f64, f64)> = Vec::with_capacity(tagged.len() / 2);
    let mut chunks = tagged.chunks_exact(2);
    for chunk in &mut chunks {
        match (chunk[0], chunk[1]) {
            ((order_sin, Phase::Sin, sin_coef), (order_cos, Phase::Cos, cos_coef))
                if order_sin == order_cos =>
            {
                pairs.push((order_sin, sin_coef, cos_coef));
            }
            ((order, _, _), _) => {
                return Err(ForecastError::UnpairedHarmonic { cycle: cycle.label(), order });
            }
        }
    }
    if let Some(&(order, _, _)) = chunks.remainder().first() {
        return Err(ForecastError::UnpairedHarmonic { cycle: cycle.label(), order });
    }

    let period = cycle.period();
    let day_count = cycle.day_count();
    let mut values = Array1::zeros(day_count);
    for day in 0..day_count {
        let mut total = 0.0;
        for &(order, sin_coef, cos_coef) in &pairs {
            let position = order as f64 * 2.0 * PI * day as f64 / period;
            total += sin_coef * position.sin() + cos_coef * position.cos();
        }
        values[day] = total;
    }

    let offset = match cycle {
        CycleKind::Weekly => 0,
        _ => 1,
    };
    let day_indices = (0..day_count as u32).map(|d| d + offset).collect();
    Ok(SeasonalCurve { cycle, day_indices, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::core::{features::DesignMatrix, series::TimeSeries};
    use chrono::{Duration, NaiveDate};
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact reconstruction of a hand-planted pure harmonic.
    // - Day-index conventions per cycle.
    // - Layout-drift error paths.
    //
    // They intentionally DO NOT cover:
    // - Recovery of coefficients by training; that is the integration
    //   suite's job.
    // -------------------------------------------------------------------------

    fn layout_for(orders: (usize, usize, usize)) -> Vec<FeatureTag> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let timestamps = (0..3).map(|d| start + Duration::days(d)).collect();
        let series = TimeSeries::new(timestamps, Array1::zeros(3)).unwrap();
        DesignMatrix::build(&series, orders.0, orders.1, orders.2).unwrap().layout
    }

    #[test]
    // Purpose
    // -------
    // Verify exact reconstruction of a planted first-order weekly wave.
    //
    // Given
    // -----
    // - Layout with orders (1, 1, 1); betas zero except weekly sin₁ = 1.5
    //   and weekly cos₁ = -0.5.
    //
    // Expect
    // ------
    // - Seven values equal to 1.5·sin(2πd/7) − 0.5·cos(2πd/7) within 1e-12,
    //   with day indices 0..=6.
    fn reconstructs_planted_weekly_wave() {
        let layout = layout_for((1, 1, 1));
        let mut betas = Array1::zeros(layout.len());
        // Layout order: const, yearly sin/cos, monthly sin/cos, weekly sin/cos.
        betas[5] = 1.5;
        betas[6] = -0.5;

        let curve = decompose(CycleKind::Weekly, &betas, &layout).unwrap();
        assert_eq!(curve.day_indices, vec![0, 1, 2, 3, 4, 5, 6]);
        for day in 0..7 {
            let position = 2.0 * PI * day as f64 / 7.0;
            let expected = 1.5 * position.sin() - 0.5 * position.cos();
            assert!((curve.values[day] - expected).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Check that higher harmonic orders and the planted amplitude survive
    // decomposition, and that unrelated cycles stay flat.
    //
    // Given
    // -----
    // - Orders (1, 1, 2) with only weekly order-2 coefficients set.
    //
    // Expect
    // ------
    // - The weekly curve oscillates at order 2 with range 2·|a|; the yearly
    //   curve is identically zero over 366 days with 1-based indices.
    fn respects_harmonic_order_and_isolates_cycles() {
        let layout = layout_for((1, 1, 2));
        let mut betas = Array1::zeros(layout.len());
        betas[7] = 2.0; // weekly sin, order 2

        let weekly = decompose(CycleKind::Weekly, &betas, &layout).unwrap();
        for day in 0..7 {
            let expected = 2.0 * (2.0 * 2.0 * PI * day as f64 / 7.0).sin();
            assert!((weekly.values[day] - expected).abs() < 1e-12);
        }

        let yearly = decompose(CycleKind::Yearly, &betas, &layout).unwrap();
        assert_eq!(yearly.day_indices.len(), 366);
        assert_eq!(yearly.day_indices[0], 1);
        assert_eq!(*yearly.day_indices.last().unwrap(), 366);
        assert!(yearly.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Ensure layout drift is a hard error.
    //
    // Given
    // -----
    // - A coefficient vector one short of the layout, and a layout whose
    //   weekly pair lost its cosine column.
    //
    // Expect
    // ------
    // - `LayoutMismatch`, then `UnpairedHarmonic { cycle: "weekly",
    //   order: 1 }`.
    fn rejects_drifted_layouts() {
        let layout = layout_for((1, 1, 1));
        let short = Array1::zeros(layout.len() - 1);
        assert_eq!(
            decompose(CycleKind::Weekly, &short, &layout).unwrap_err(),
            ForecastError::LayoutMismatch { expected: layout.len(), actual: layout.len() - 1 }
        );

        let mut broken = layout.clone();
        broken.pop(); // drop weekly cos_1
        let betas = Array1::zeros(broken.len());
        assert_eq!(
            decompose(CycleKind::Weekly, &betas, &broken).unwrap_err(),
            ForecastError::UnpairedHarmonic { cycle: "weekly", order: 1 }
        );
    }
}
