//! Change summary for the latest month of a series.

use housing_market_analytics_models::{ChangeSummary, ComparisonMode};
use housing_market_panel_models::MetricSeries;

use crate::ComparisonEngine;

impl ComparisonEngine {
    /// Summarizes the latest point of `series` under every baseline mode.
    ///
    /// Returns `None` for an empty series.
    #[must_use]
    pub fn change_summary(&self, series: &MetricSeries, baseline_year: i32) -> Option<ChangeSummary> {
        let date = series.latest_date()?;
        let compare = |mode| self.compare(series, mode, date);

        Some(ChangeSummary {
            geo_id: series.geo_id.clone(),
            metric: series.metric.clone(),
            date,
            value: series.value_at(date),
            month_over_month: compare(ComparisonMode::MoM),
            year_over_year: compare(ComparisonMode::YoY),
            baseline_year,
            since_baseline: compare(ComparisonMode::SinceBaselineYear(baseline_year)),
            seasonality: compare(ComparisonMode::Seasonality),
        })
    }
}
