//! Plain-text tables for terminal output.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use housing_market_analytics_models::{
    ChangeSummary, ComparisonMode, ComparisonResult, LevelSnapshot, SeasonalOverlay,
};
use housing_market_format::MetricFormatter;
use housing_market_geography_models::GeoEntity;
use housing_market_panel_models::MetricSeries;

const RULE_WIDTH: usize = 60;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn entities(entities: &[GeoEntity]) -> String {
    let mut out = format!("{:<12} NAME\n{}\n", "ID", rule());
    for entity in entities {
        out.push_str(&format!("{:<12} {}\n", entity.id, entity.display_name));
    }
    out
}

pub fn series(entity: &GeoEntity, series: &MetricSeries) -> String {
    let mut out = format!("{} ({})\n", entity.display_name, series.metric);
    if series.is_empty() {
        out.push_str("  No data available\n");
        return out;
    }

    out.push_str(&format!("{:<10} {:>16}\n{}\n", "MONTH", "VALUE", rule()));
    for point in &series.points {
        out.push_str(&format!(
            "{:<10} {:>16}\n",
            month(point.date),
            MetricFormatter::format_value(point.value, &series.metric),
        ));
    }
    out
}

pub fn comparisons(
    entity: &GeoEntity,
    metric: &str,
    mode: ComparisonMode,
    results: &[ComparisonResult],
) -> String {
    let mut out = format!("{} ({metric}, {mode})\n", entity.display_name);
    if results.is_empty() {
        out.push_str("  No data available\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} {:>16} {:>16} {:>10} {:>14}\n{}\n",
        "MONTH",
        "VALUE",
        "BASELINE",
        "DELTA",
        "CHANGE",
        rule(),
    ));
    for result in results {
        out.push_str(&format!(
            "{:<10} {:>16} {:>16} {:>10} {:>14}\n",
            month(result.point_date),
            MetricFormatter::format_value(result.raw_value, metric),
            MetricFormatter::format_value(result.baseline_value, metric),
            MetricFormatter::format_delta(result.delta_pct),
            MetricFormatter::format_change(result.absolute_change(), metric),
        ));
    }
    out
}

pub fn summaries(entity: &GeoEntity, summaries: &[ChangeSummary]) -> String {
    let mut out = format!("{}\n", entity.display_name);
    let Some(first) = summaries.first() else {
        out.push_str("  No data available\n");
        return out;
    };

    let since = format!("SINCE {}", first.baseline_year);
    out.push_str(&format!(
        "{:<26} {:>8} {:>14} {:>8} {:>8} {:>11} {:>11}\n{}\n",
        "METRIC",
        "MONTH",
        "VALUE",
        "MOM",
        "YOY",
        since,
        "SEASONAL",
        "-".repeat(RULE_WIDTH + 32),
    ));
    for summary in summaries {
        out.push_str(&format!(
            "{:<26} {:>8} {:>14} {:>8} {:>8} {:>11} {:>11}\n",
            summary.metric,
            month(summary.date),
            MetricFormatter::format_value(summary.value, &summary.metric),
            MetricFormatter::format_delta(summary.month_over_month.delta_pct),
            MetricFormatter::format_delta(summary.year_over_year.delta_pct),
            MetricFormatter::format_delta(summary.since_baseline.delta_pct),
            MetricFormatter::format_delta(summary.seasonality.delta_pct),
        ));
    }
    out
}

pub fn overlay(entity: &GeoEntity, overlay: &SeasonalOverlay) -> String {
    let metric = overlay.metric.as_str();
    let mut out = format!("{} ({metric})\n{:<6}", entity.display_name, "YEAR");
    for name in MONTHS {
        out.push_str(&format!(" {name:>10}"));
    }
    out.push('\n');

    let mut row = |label: &str, values: &[Option<f64>; 12]| {
        out.push_str(&format!("{label:<6}"));
        for value in values {
            out.push_str(&format!(" {:>10}", MetricFormatter::format_value(*value, metric)));
        }
        out.push('\n');
    };

    for year in &overlay.years {
        row(&year.year.to_string(), &year.months);
    }
    row("AVG", &overlay.historical_average);

    out
}

pub fn snapshot(
    snapshot: &LevelSnapshot,
    names: &BTreeMap<String, String>,
    limit: Option<usize>,
) -> String {
    let metric = snapshot.metric.as_str();
    let mut out = format!("{metric}, {} at {}\n", snapshot.mode, month(snapshot.date));

    let displayed = |result: &ComparisonResult| {
        if snapshot.mode.has_baseline() {
            result.delta_pct
        } else {
            result.raw_value
        }
    };
    let render = |value: Option<f64>| {
        if snapshot.mode.has_baseline() {
            MetricFormatter::format_delta(value)
        } else {
            MetricFormatter::format_value(value, metric)
        }
    };

    let mut entries: Vec<_> = snapshot.entries.iter().collect();
    entries.sort_by(|a, b| descending(displayed(&a.result), displayed(&b.result)));

    out.push_str(&format!(
        "{:<12} {:<36} {:>14}\n{}\n",
        "ID",
        "NAME",
        snapshot.mode.to_string(),
        rule(),
    ));
    for entry in entries.into_iter().take(limit.unwrap_or(usize::MAX)) {
        let name = names.get(&entry.geo_id).map_or(entry.geo_id.as_str(), String::as_str);
        out.push_str(&format!(
            "{:<12} {:<36} {:>14}\n",
            entry.geo_id,
            name,
            render(displayed(&entry.result)),
        ));
    }

    match snapshot.range {
        Some(range) => {
            out.push_str(&format!(
                "{}\n{} with data, range {} to {}\n",
                rule(),
                range.count,
                render(Some(range.min)),
                render(Some(range.max)),
            ));
        }
        None => {
            out.push_str(&format!("{}\nNo data available\n", rule()));
        }
    }

    out
}

/// Largest first, missing values last.
fn descending(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (a, b) => b.is_some().cmp(&a.is_some()),
    }
}

#[cfg(test)]
mod tests {
    use housing_market_analytics_models::{SeasonalYear, SnapshotEntry, ValueRange};
    use housing_market_geography_models::GeoLevel;
    use housing_market_panel_models::SeriesPoint;
    use housing_market_panel_models::month::month_start;

    use super::*;

    fn result(raw: Option<f64>, delta: Option<f64>) -> ComparisonResult {
        ComparisonResult {
            point_date: month_start(2024, 1).unwrap(),
            raw_value: raw,
            baseline_value: None,
            baseline_date: None,
            delta_pct: delta,
        }
    }

    #[test]
    fn empty_series_shows_placeholder() {
        let entity = GeoEntity::new(GeoLevel::Zip, "90210", "90210 - Beverly Hills, CA");
        let text = series(&entity, &MetricSeries::empty("90210", "active_listing_count"));
        assert!(text.contains("No data available"));
    }

    #[test]
    fn series_values_are_formatted() {
        let entity = GeoEntity::new(GeoLevel::State, "06", "California");
        let s = MetricSeries::new(
            "06",
            "median_listing_price",
            vec![SeriesPoint {
                date: month_start(2024, 1).unwrap(),
                value: Some(750_000.0),
            }],
        );
        let text = series(&entity, &s);
        assert!(text.contains("2024-01"));
        assert!(text.contains("$750,000"));
    }

    #[test]
    fn overlay_has_a_row_per_year_and_an_average() {
        let entity = GeoEntity::new(GeoLevel::State, "06", "California");
        let mut months = [None; 12];
        months[0] = Some(1500.0);
        let pivot = SeasonalOverlay {
            geo_id: "06".to_owned(),
            metric: "active_listing_count".to_owned(),
            years: vec![SeasonalYear { year: 2024, months }],
            historical_average: [None; 12],
        };

        let text = overlay(&entity, &pivot);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("YEAR") && lines[1].ends_with("Dec"));
        assert!(lines[2].starts_with("2024") && lines[2].contains("1,500"));
        assert!(lines[3].starts_with("AVG"));
        assert_eq!(lines[3].matches("N/A").count(), 12);
    }

    #[test]
    fn comparison_rows_show_delta_and_change() {
        let entity = GeoEntity::new(GeoLevel::State, "06", "California");
        let row = ComparisonResult {
            baseline_value: Some(45_000.0),
            ..result(Some(50_000.0), Some(11.111))
        };

        let text = comparisons(&entity, "active_listing_count", ComparisonMode::YoY, &[row]);
        assert!(text.starts_with("California (active_listing_count, YoY)\n"));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("2024-01"));
        assert!(last.contains("50,000") && last.contains("45,000"));
        assert!(last.contains("+11.1%") && last.contains("+5,000"));
    }

    #[test]
    fn snapshot_sorts_descending_with_missing_last() {
        let snap = LevelSnapshot {
            metric: "active_listing_count".to_owned(),
            mode: ComparisonMode::YoY,
            date: month_start(2024, 1).unwrap(),
            entries: vec![
                SnapshotEntry {
                    geo_id: "06".to_owned(),
                    result: result(Some(1.0), Some(-3.0)),
                },
                SnapshotEntry {
                    geo_id: "36".to_owned(),
                    result: result(Some(1.0), None),
                },
                SnapshotEntry {
                    geo_id: "48".to_owned(),
                    result: result(Some(1.0), Some(12.5)),
                },
            ],
            range: Some(ValueRange {
                count: 2,
                min: -3.0,
                max: 12.5,
            }),
        };
        let names = BTreeMap::from([("48".to_owned(), "Texas".to_owned())]);

        let text = snapshot(&snap, &names, None);
        let texas = text.find("Texas").unwrap();
        let california = text.find("\n06 ").unwrap();
        let new_york = text.find("\n36 ").unwrap();
        assert!(texas < california && california < new_york);
        assert!(text.contains("range -3.0% to +12.5%"));

        let limited = snapshot(&snap, &names, Some(1));
        assert!(!limited.contains("\n06 "));
    }
}
