//! Month-by-year pivot of a series.

use chrono::Datelike;
use housing_market_analytics_models::{SeasonalOverlay, SeasonalYear};
use housing_market_panel_models::MetricSeries;

use crate::{ComparisonEngine, mean};

impl ComparisonEngine {
    /// Pivots the most recent `years` calendar years of `series` into one
    /// January..December row per year.
    ///
    /// The window ends at the year of the latest point and never starts
    /// before the earliest point. `historical_average` is the per-month mean
    /// of every row except the last, skipping nulls. Returns `None` for an
    /// empty series.
    #[must_use]
    pub fn seasonal_overlay(&self, series: &MetricSeries, years: usize) -> Option<SeasonalOverlay> {
        let first_year = series.points.first()?.date.year();
        let last_year = series.latest_date()?.year();
        let span = i32::try_from(years.max(1)).unwrap_or(i32::MAX);
        let start_year = last_year.saturating_sub(span - 1).max(first_year);

        let mut rows: Vec<SeasonalYear> = (start_year..=last_year)
            .map(|year| SeasonalYear {
                year,
                months: [None; 12],
            })
            .collect();

        for point in &series.points {
            let Ok(row) = usize::try_from(point.date.year() - start_year) else {
                continue;
            };
            if let Some(row) = rows.get_mut(row) {
                row.months[point.date.month0() as usize] = point.value;
            }
        }

        let prior = &rows[..rows.len() - 1];
        let historical_average =
            std::array::from_fn(|month| mean(prior.iter().filter_map(|row| row.months[month])));

        log::debug!(
            "seasonal_overlay: {} {} years {start_year}..={last_year}",
            series.geo_id,
            series.metric,
        );

        Some(SeasonalOverlay {
            geo_id: series.geo_id.clone(),
            metric: series.metric.clone(),
            years: rows,
            historical_average,
        })
    }
}
