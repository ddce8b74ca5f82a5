//! Turns a [`RawTable`] into a validated [`Panel`].

use housing_market_geography_models::{GeoLevel, codes, fips};
use housing_market_panel_models::{Metric, Panel, PanelBuilder, PanelRecord, month::parse_month};

use crate::source::RawTable;
use crate::{MONTH_COLUMN, PanelError};

/// Column positions resolved once per table.
struct Layout {
    month: usize,
    id: Option<usize>,
    fallback_id: Option<usize>,
    name: Option<usize>,
    metrics: Vec<usize>,
}

fn data_source(level: GeoLevel, message: impl Into<String>) -> PanelError {
    PanelError::DataSource {
        level,
        message: message.into(),
    }
}

fn resolve_layout(level: GeoLevel, table: &RawTable) -> Result<(Layout, Vec<String>), PanelError> {
    let month = table
        .column(MONTH_COLUMN)
        .ok_or_else(|| data_source(level, format!("missing column '{MONTH_COLUMN}'")))?;

    let id = table.column(level.id_column());
    let fallback_id = level.fallback_id_column().and_then(|c| table.column(c));
    if id.is_none() && fallback_id.is_none() {
        return Err(data_source(
            level,
            format!("missing column '{}'", level.id_column()),
        ));
    }

    let mut names = Vec::new();
    let mut positions = Vec::new();
    let mut missing = Vec::new();
    for metric in Metric::all() {
        match table.column(metric.column()) {
            Some(i) => {
                names.push(metric.column().to_owned());
                positions.push(i);
            }
            None => missing.push(metric.column()),
        }
    }
    if !missing.is_empty() {
        log::warn!(
            "{level} panel is missing metric columns: {}",
            missing.join(", ")
        );
    }

    Ok((
        Layout {
            month,
            id,
            fallback_id,
            name: table.column(level.name_column()),
            metrics: positions,
        },
        names,
    ))
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map_or("", String::as_str)
}

/// Parses a metric cell. Blank, non-numeric, and non-finite cells are
/// missing observations.
fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn derive_id(level: GeoLevel, row: &[String], layout: &Layout) -> Option<String> {
    level
        .canonical_id(cell(row, layout.id))
        .or_else(|| level.canonical_id(cell(row, layout.fallback_id)))
}

fn display_name(level: GeoLevel, geo_id: &str, raw_name: &str) -> String {
    let raw_name = raw_name.trim();
    match level {
        GeoLevel::Country => codes::UNITED_STATES_NAME.to_owned(),
        GeoLevel::State => fips::state_name(geo_id).to_owned(),
        _ if raw_name.is_empty() => geo_id.to_owned(),
        GeoLevel::Metro => raw_name.to_owned(),
        GeoLevel::County => codes::county_display_name(raw_name),
        GeoLevel::Zip => format!("{geo_id} - {raw_name}"),
    }
}

/// Builds the panel for `level`.
///
/// Rows whose id cannot be derived are dropped and counted; an unparseable
/// month or a duplicate `(geo_id, date)` rejects the whole table.
pub(crate) fn build_panel(
    level: GeoLevel,
    table: &RawTable,
    version: u64,
) -> Result<Panel, PanelError> {
    let (layout, metric_names) = resolve_layout(level, table)?;
    let mut builder = PanelBuilder::new(level, metric_names);

    for (i, row) in table.rows().iter().enumerate() {
        let raw_month = cell(row, Some(layout.month));
        let date = parse_month(raw_month).ok_or_else(|| {
            // +2: one for the header row, one for 1-based line numbers
            data_source(
                level,
                format!("invalid month '{raw_month}' on line {}", i + 2),
            )
        })?;

        let Some(geo_id) = derive_id(level, row, &layout) else {
            builder.drop_row();
            continue;
        };

        let values = layout
            .metrics
            .iter()
            .map(|&idx| parse_value(cell(row, Some(idx))))
            .collect();
        let name = display_name(level, &geo_id, cell(row, layout.name));

        builder.push(
            PanelRecord {
                geo_id,
                date,
                values,
            },
            &name,
        );
    }

    if builder.dropped_rows() > 0 {
        log::warn!(
            "Dropped {} {level} rows with no derivable id",
            builder.dropped_rows()
        );
    }

    builder
        .build(version)
        .map_err(|e| PanelError::DuplicateRow {
            level,
            geo_id: e.geo_id,
            date: e.date,
        })
}

#[cfg(test)]
mod tests {
    use housing_market_panel_models::month::month_start;

    use super::*;

    fn build(level: GeoLevel, csv: &str) -> Result<Panel, PanelError> {
        build_panel(level, &RawTable::from_csv_str(csv).unwrap(), 1)
    }

    #[test]
    fn derives_state_fips_from_names_and_abbreviations() {
        let panel = build(
            GeoLevel::State,
            "month_date_yyyymm,state,state_id,active_listing_count\n\
             202401,California,ca,50000\n\
             202401,,TX,40000\n\
             202401,Atlantis,,1\n",
        )
        .unwrap();

        assert_eq!(panel.geo_ids().collect::<Vec<_>>(), vec!["06", "48"]);
        assert_eq!(panel.display_name("48"), Some("Texas"));
        assert_eq!(panel.dropped_rows(), 1);
    }

    #[test]
    fn recases_county_names_and_pads_fips() {
        let panel = build(
            GeoLevel::County,
            "month_date_yyyymm,county_fips,county_name,median_listing_price\n\
             202401,6037,\"los angeles, ca\",1100000\n",
        )
        .unwrap();

        assert_eq!(panel.display_name("06037"), Some("Los Angeles, CA"));
    }

    #[test]
    fn composes_zip_display_names() {
        let panel = build(
            GeoLevel::Zip,
            "month_date_yyyymm,postal_code,zip_name,active_listing_count\n\
             202401,90210,\"beverly hills, ca\",120\n\
             202401,501,,3\n",
        )
        .unwrap();

        assert_eq!(panel.display_name("90210"), Some("90210 - beverly hills, ca"));
        assert_eq!(panel.display_name("00501"), Some("00501"));
    }

    #[test]
    fn maps_country_name_to_numeric_code() {
        let panel = build(
            GeoLevel::Country,
            "month_date_yyyymm,country,active_listing_count\n202401,United States,700000\n",
        )
        .unwrap();

        assert!(panel.contains("840"));
        assert_eq!(panel.display_name("840"), Some("United States"));
    }

    #[test]
    fn missing_values_stay_missing() {
        let panel = build(
            GeoLevel::Metro,
            "month_date_yyyymm,cbsa_code,cbsa_title,median_days_on_market,pending_ratio\n\
             202401,31080,\"Los Angeles-Long Beach-Anaheim, CA\",,NaN\n",
        )
        .unwrap();

        let row = &panel.records()[0];
        assert_eq!(row.values, vec![None, None]);
        assert_eq!(row.date, month_start(2024, 1).unwrap());
    }

    #[test]
    fn rejects_bad_month() {
        let err = build(
            GeoLevel::State,
            "month_date_yyyymm,state\n202401,California\nnot-a-month,Texas\n",
        )
        .unwrap_err();

        assert!(
            matches!(&err, PanelError::DataSource { message, .. } if message.contains("line 3")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_missing_id_column() {
        let err = build(GeoLevel::Zip, "month_date_yyyymm,zip_name\n202401,x\n").unwrap_err();
        assert!(matches!(err, PanelError::DataSource { level: GeoLevel::Zip, .. }));
    }

    #[test]
    fn rejects_duplicate_rows() {
        let err = build(
            GeoLevel::State,
            "month_date_yyyymm,state,active_listing_count\n\
             202401,California,1\n\
             202401,CA,2\n",
        )
        .unwrap_err();

        assert_eq!(
            err,
            PanelError::DuplicateRow {
                level: GeoLevel::State,
                geo_id: "06".to_owned(),
                date: month_start(2024, 1).unwrap(),
            }
        );
    }
}
