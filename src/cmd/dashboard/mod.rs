//! Dashboard command - self-contained HTML page with both selectors and charts
//!
//! Every report the selectors can reach is built up front and embedded as
//! JSON; the page script only looks results up and draws them.

mod html;

use super::DataArgs;
use crate::domain::{
    build_report, year_selector_disabled, BuildOptions, Dataset, Report, ReportType, Selection,
    YEARS,
};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use html::generate_html;

pub const TITLE: &str = "Automobile Sales Statistics Dashboard";

#[derive(Args, Debug)]
pub struct DashboardCommand {
    #[command(flatten)]
    data: DataArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DashboardCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let dataset = self.data.load()?;
        let data = build_dashboard_data(&dataset, &self.data.build_options());
        let html = generate_html(&data)?;

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            log::info!("Dashboard written to {}", output_path.display());
            println!("Dashboard written to: {}", output_path.display());
        } else {
            let temp_path = std::env::temp_dir().join("autodash.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened dashboard in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Data embedded in the page as JSON
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub title: &'static str,
    pub report_types: Vec<SelectOption>,
    pub years: Vec<i32>,
    /// Year selector disabled state by report-type value; "" is the placeholder
    pub year_disabled: BTreeMap<String, bool>,
    pub recession: Report,
    pub yearly: BTreeMap<i32, Report>,
    pub summary: DatasetSummary,
}

#[derive(Debug, Serialize)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
}

pub fn build_dashboard_data(dataset: &Dataset, options: &BuildOptions) -> DashboardData {
    let report_types = ReportType::OPTIONS
        .into_iter()
        .map(|t| SelectOption {
            label: t.label(),
            value: t.label(),
        })
        .collect();

    let mut year_disabled: BTreeMap<String, bool> = ReportType::OPTIONS
        .into_iter()
        .map(|t| (t.label().to_string(), year_selector_disabled(t)))
        .collect();
    year_disabled.insert(String::new(), year_selector_disabled(ReportType::Unselected));

    let recession = build_report(dataset, &Selection::recession(), options);
    let yearly = YEARS
        .map(|year| (year, build_report(dataset, &Selection::yearly(year), options)))
        .collect();

    let span = dataset.year_span();
    log::debug!("Built recession report and {} yearly reports", YEARS.count());

    DashboardData {
        title: TITLE,
        report_types,
        years: YEARS.collect(),
        year_disabled,
        recession,
        yearly,
        summary: DatasetSummary {
            records: dataset.len(),
            first_year: span.map(|(first, _)| first),
            last_year: span.map(|(_, last)| last),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::record;

    fn dataset() -> Dataset {
        vec![
            record(1980, "Jan", true, "Car", 10.0, 100.0, 7.0),
            record(1995, "Jun", false, "Truck", 30.0, 300.0, 4.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn every_year_has_a_report() {
        let data = build_dashboard_data(&dataset(), &BuildOptions::default());
        assert_eq!(data.years.len(), 44);
        assert_eq!(data.years.first(), Some(&1980));
        assert_eq!(data.years.last(), Some(&2023));
        assert_eq!(data.yearly.len(), 44);
        assert!(data.yearly.values().all(|r| r.chart_count() == 4));
        assert_eq!(data.recession.chart_count(), 4);
    }

    #[test]
    fn gate_table_covers_placeholder() {
        let data = build_dashboard_data(&dataset(), &BuildOptions::default());
        assert_eq!(data.year_disabled.get("Yearly Statistics"), Some(&false));
        assert_eq!(
            data.year_disabled.get("Recession Period Statistics"),
            Some(&true)
        );
        assert_eq!(data.year_disabled.get(""), Some(&true));
    }

    #[test]
    fn summary_describes_dataset() {
        let data = build_dashboard_data(&dataset(), &BuildOptions::default());
        assert_eq!(data.summary.records, 2);
        assert_eq!(data.summary.first_year, Some(1980));
        assert_eq!(data.summary.last_year, Some(1995));
    }

    #[test]
    fn yearly_json_keyed_by_year() {
        let data = build_dashboard_data(&dataset(), &BuildOptions::default());
        let json = serde_json::to_value(&data).unwrap();
        let title = &json["yearly"]["1995"]["rows"][1][0]["title"];
        assert_eq!(title, "Average Vehicles Sold by Vehicle Type in the year 1995");
        assert_eq!(json["report_types"][1]["value"], "Recession Period Statistics");
    }
}
