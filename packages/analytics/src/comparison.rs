//! Single-point and whole-series comparisons.

use chrono::{Datelike, NaiveDate};
use housing_market_analytics_models::{ComparisonMode, ComparisonResult, ComparisonSeries};
use housing_market_panel_models::MetricSeries;
use housing_market_panel_models::month::{month_start, shift_months, truncate_to_month};

use crate::mean;

/// Computes comparisons over [`MetricSeries`] values.
///
/// The engine holds no state; it exists so every consumer goes through the
/// same set of rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonEngine;

/// Percent change from `baseline` to `raw`.
///
/// `None` when either operand is missing, the baseline is zero, or the
/// result is not finite.
#[must_use]
pub fn delta_pct(raw: Option<f64>, baseline: Option<f64>) -> Option<f64> {
    let (raw, baseline) = (raw?, baseline?);
    if baseline == 0.0 {
        return None;
    }

    let delta = (raw - baseline) / baseline * 100.0;
    delta.is_finite().then_some(delta)
}

impl ComparisonEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compares the point at `target` against its baseline under `mode`.
    ///
    /// `target` is truncated to its month. A target with no point in the
    /// series yields a `None` raw value and so a `None` delta.
    #[must_use]
    pub fn compare(
        &self,
        series: &MetricSeries,
        mode: ComparisonMode,
        target: NaiveDate,
    ) -> ComparisonResult {
        let target = truncate_to_month(target);
        let raw_value = series.value_at(target);
        let (baseline_value, baseline_date) = baseline(series, mode, target);

        ComparisonResult {
            point_date: target,
            raw_value,
            baseline_value,
            baseline_date,
            delta_pct: delta_pct(raw_value, baseline_value),
        }
    }

    /// Compares the latest point of the series, `None` if it is empty.
    #[must_use]
    pub fn compare_latest(
        &self,
        series: &MetricSeries,
        mode: ComparisonMode,
    ) -> Option<ComparisonResult> {
        series
            .latest_date()
            .map(|latest| self.compare(series, mode, latest))
    }

    /// Compares every point of the series, aligned date-for-date.
    ///
    /// Gaps are not filled: a point whose exact baseline month is absent
    /// gets a `None` delta while its neighbours are unaffected.
    #[must_use]
    pub fn compare_series(&self, series: &MetricSeries, mode: ComparisonMode) -> ComparisonSeries {
        let points = series
            .points
            .iter()
            .map(|point| self.compare(series, mode, point.date))
            .collect();

        ComparisonSeries {
            geo_id: series.geo_id.clone(),
            metric: series.metric.clone(),
            mode,
            points,
        }
    }
}

fn baseline(
    series: &MetricSeries,
    mode: ComparisonMode,
    target: NaiveDate,
) -> (Option<f64>, Option<NaiveDate>) {
    let exact = |date: Option<NaiveDate>| {
        date.and_then(|date| series.point_at(date))
            .map_or((None, None), |point| (point.value, Some(point.date)))
    };

    match mode {
        ComparisonMode::Value => (None, None),
        ComparisonMode::MoM => exact(shift_months(target, -1)),
        ComparisonMode::YoY => exact(shift_months(target, -12)),
        ComparisonMode::SinceBaselineYear(year) => exact(month_start(year, target.month())),
        ComparisonMode::Seasonality => (seasonal_norm(series, target), None),
    }
}

/// Mean of every earlier year's value for the target's calendar month.
fn seasonal_norm(series: &MetricSeries, target: NaiveDate) -> Option<f64> {
    mean(
        series
            .points
            .iter()
            .filter(|p| p.date.year() < target.year() && p.date.month() == target.month())
            .filter_map(|p| p.value),
    )
}

#[cfg(test)]
mod tests {
    use housing_market_panel_models::SeriesPoint;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn month(year: i32, month: u32) -> NaiveDate {
        month_start(year, month).unwrap()
    }

    fn series(points: &[(i32, u32, Option<f64>)]) -> MetricSeries {
        MetricSeries::new(
            "06",
            "active_listing_count",
            points
                .iter()
                .map(|&(y, m, value)| SeriesPoint {
                    date: month(y, m),
                    value,
                })
                .collect(),
        )
    }

    fn monthly(start_year: i32, values: &[f64]) -> MetricSeries {
        let start = month(start_year, 1);
        MetricSeries::new(
            "06",
            "active_listing_count",
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| SeriesPoint {
                    date: shift_months(start, i32::try_from(i).unwrap()).unwrap(),
                    value: Some(v),
                })
                .collect(),
        )
    }

    #[test]
    fn delta_requires_nonzero_baseline() {
        assert!((delta_pct(Some(110.0), Some(100.0)).unwrap() - 10.0).abs() < EPSILON);
        assert_eq!(delta_pct(Some(110.0), Some(0.0)), None);
        assert_eq!(delta_pct(None, Some(100.0)), None);
        assert_eq!(delta_pct(Some(110.0), None), None);
    }

    #[test]
    fn value_mode_has_no_baseline() {
        let s = series(&[(2024, 1, Some(5.0))]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::Value, month(2024, 1));
        assert_eq!(result.raw_value, Some(5.0));
        assert_eq!(result.baseline_value, None);
        assert_eq!(result.baseline_date, None);
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn yoy_matches_twelve_months_earlier() {
        let values: Vec<f64> = (0..30_i32).map(|i| f64::from(i).mul_add(3.5, 100.0)).collect();
        let s = monthly(2021, &values);
        let engine = ComparisonEngine::new();

        for (t, point) in s.points.iter().enumerate().skip(12) {
            let result = engine.compare(&s, ComparisonMode::YoY, point.date);
            let expected = (values[t] - values[t - 12]) / values[t - 12] * 100.0;
            assert!((result.delta_pct.unwrap() - expected).abs() < EPSILON);
            assert_eq!(result.baseline_date, Some(s.points[t - 12].date));
        }
    }

    #[test]
    fn mom_at_earliest_point_is_none() {
        let s = monthly(2024, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::MoM, month(2024, 1));
        assert_eq!(result.raw_value, Some(1.0));
        assert_eq!(result.baseline_value, None);
        assert_eq!(result.delta_pct, None);

        let result = ComparisonEngine.compare(&s, ComparisonMode::MoM, month(2024, 6));
        assert!((result.delta_pct.unwrap() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn mom_never_uses_a_non_adjacent_month() {
        let s = series(&[(2024, 1, Some(100.0)), (2024, 3, Some(120.0))]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::MoM, month(2024, 3));
        assert_eq!(result.baseline_value, None);
        assert_eq!(result.baseline_date, None);
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn seasonality_averages_prior_years() {
        let s = series(&[
            (2021, 3, Some(100.0)),
            (2022, 3, Some(110.0)),
            (2022, 4, Some(999.0)),
            (2023, 3, Some(105.0)),
            (2024, 3, Some(120.0)),
        ]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::Seasonality, month(2024, 3));
        assert!((result.baseline_value.unwrap() - 105.0).abs() < EPSILON);
        assert!((result.delta_pct.unwrap() - 14.285_714_285_714_286).abs() < 1e-6);
        assert_eq!(result.baseline_date, None);
    }

    #[test]
    fn seasonality_skips_nulls_and_needs_history() {
        let s = series(&[(2022, 3, None), (2023, 3, Some(100.0)), (2024, 3, Some(90.0))]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::Seasonality, month(2024, 3));
        assert_eq!(result.baseline_value, Some(100.0));

        let first = ComparisonEngine.compare(&s, ComparisonMode::Seasonality, month(2022, 3));
        assert_eq!(first.baseline_value, None);
        assert_eq!(first.delta_pct, None);
    }

    #[test]
    fn since_baseline_year_without_that_year_is_none() {
        let s = series(&[(2020, 5, Some(10.0)), (2024, 5, Some(12.0))]);
        let result =
            ComparisonEngine.compare(&s, ComparisonMode::SinceBaselineYear(2019), month(2024, 5));
        assert_eq!(result.raw_value, Some(12.0));
        assert_eq!(result.delta_pct, None);

        let result =
            ComparisonEngine.compare(&s, ComparisonMode::SinceBaselineYear(2020), month(2024, 5));
        assert_eq!(result.baseline_date, Some(month(2020, 5)));
        assert!((result.delta_pct.unwrap() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn baseline_date_is_kept_when_baseline_value_is_null() {
        let s = series(&[(2023, 1, None), (2024, 1, Some(12.0))]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::YoY, month(2024, 1));
        assert_eq!(result.baseline_date, Some(month(2023, 1)));
        assert_eq!(result.baseline_value, None);
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn zero_baseline_gives_none() {
        let s = series(&[(2023, 12, Some(0.0)), (2024, 1, Some(12.0))]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::MoM, month(2024, 1));
        assert_eq!(result.baseline_value, Some(0.0));
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn absent_target_is_not_an_error() {
        let s = series(&[(2023, 1, Some(10.0))]);
        let result = ComparisonEngine.compare(&s, ComparisonMode::YoY, month(2024, 1));
        assert_eq!(result.raw_value, None);
        assert_eq!(result.baseline_value, Some(10.0));
        assert_eq!(result.delta_pct, None);
    }

    #[test]
    fn target_is_truncated_to_month() {
        let s = series(&[(2023, 12, Some(100.0)), (2024, 1, Some(150.0))]);
        let mid_month = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let result = ComparisonEngine.compare(&s, ComparisonMode::MoM, mid_month);
        assert_eq!(result.point_date, month(2024, 1));
        assert!((result.delta_pct.unwrap() - 50.0).abs() < EPSILON);
    }

    #[test]
    fn compare_latest_on_empty_series_is_none() {
        let empty = MetricSeries::empty("90210", "active_listing_count");
        assert!(ComparisonEngine.compare_latest(&empty, ComparisonMode::MoM).is_none());
    }

    #[test]
    fn batch_nulls_only_points_after_a_gap() {
        let s = series(&[
            (2024, 1, Some(100.0)),
            (2024, 2, Some(110.0)),
            (2024, 4, Some(120.0)),
            (2024, 5, Some(126.0)),
        ]);
        let batch = ComparisonEngine.compare_series(&s, ComparisonMode::MoM);
        assert_eq!(batch.points.len(), 4);
        assert_eq!(batch.geo_id, "06");

        let deltas: Vec<_> = batch.points.iter().map(|r| r.delta_pct).collect();
        assert_eq!(deltas[0], None);
        assert!((deltas[1].unwrap() - 10.0).abs() < EPSILON);
        assert_eq!(deltas[2], None);
        assert!((deltas[3].unwrap() - 5.0).abs() < EPSILON);

        let dates: Vec<_> = batch.points.iter().map(|r| r.point_date).collect();
        let source: Vec<_> = s.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, source);
    }
}
