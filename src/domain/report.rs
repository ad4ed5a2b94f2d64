//! Report building: maps a (report type, year) selection to its four charts.

use super::aggregate::{MonthOrder, Reduction};
use super::chart::ChartDescriptor;
use super::dataset::Dataset;
use super::record::Field;
use schemars::JsonSchema;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Years offered by the year selector.
pub const YEARS: RangeInclusive<i32> = 1980..=2023;

/// Charts per row of the output region.
const CHARTS_PER_ROW: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReportType {
    YearlyStatistics,
    RecessionStatistics,
    #[default]
    Unselected,
}

impl ReportType {
    /// Report types the selector offers, in display order.
    pub const OPTIONS: [ReportType; 2] = [
        ReportType::YearlyStatistics,
        ReportType::RecessionStatistics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportType::YearlyStatistics => "Yearly Statistics",
            ReportType::RecessionStatistics => "Recession Period Statistics",
            ReportType::Unselected => "Select Statistics",
        }
    }

    /// Selector value to report type. Anything unrecognised is `Unselected`.
    #[cfg(test)]
    pub fn from_label(label: &str) -> Self {
        ReportType::OPTIONS
            .into_iter()
            .find(|t| t.label() == label)
            .unwrap_or(ReportType::Unselected)
    }
}

/// Current state of the two selectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub report_type: ReportType,
    pub year: Option<i32>,
}

impl Selection {
    pub fn recession() -> Self {
        Selection {
            report_type: ReportType::RecessionStatistics,
            year: None,
        }
    }

    pub fn yearly(year: i32) -> Self {
        Selection {
            report_type: ReportType::YearlyStatistics,
            year: Some(year),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub month_order: MonthOrder,
}

/// Charts laid out in rows; empty when there is nothing to show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct Report {
    pub rows: Vec<Vec<ChartDescriptor>>,
}

impl Report {
    fn from_charts(charts: Vec<ChartDescriptor>) -> Self {
        let mut rows = Vec::with_capacity(charts.len().div_ceil(CHARTS_PER_ROW));
        let mut charts = charts.into_iter().peekable();
        while charts.peek().is_some() {
            rows.push(charts.by_ref().take(CHARTS_PER_ROW).collect());
        }
        Report { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Charts in reading order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartDescriptor> {
        self.rows.iter().flatten()
    }

    pub fn chart_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// Build the report for `selection`.
///
/// Incomplete selections (no report type, or the yearly report without a
/// year) give an empty report rather than an error.
pub fn build_report(data: &Dataset, selection: &Selection, options: &BuildOptions) -> Report {
    match (selection.report_type, selection.year) {
        (ReportType::RecessionStatistics, _) => recession_report(data),
        (ReportType::YearlyStatistics, Some(year)) => yearly_report(data, year, options),
        _ => Report::default(),
    }
}

fn recession_report(data: &Dataset) -> Report {
    let recession = data.filter(|r| r.recession);

    let yearly = recession.group_by(&[Field::Year], Field::AutomobileSales, Reduction::Mean);
    let by_type = recession.group_by(&[Field::VehicleType], Field::AutomobileSales, Reduction::Mean);
    let ad_spend = recession.group_by(
        &[Field::VehicleType],
        Field::AdvertisingExpenditure,
        Reduction::Sum,
    );
    let unemployment = recession.group_by(
        &[Field::UnemploymentRate, Field::VehicleType],
        Field::AutomobileSales,
        Reduction::Mean,
    );

    Report::from_charts(vec![
        ChartDescriptor::line(
            "Automobile Sales Fluctuation Over Recession Period (Year-wise)",
            Field::Year,
            Field::AutomobileSales,
            yearly,
        ),
        ChartDescriptor::bar(
            "Average Automobile Sales by Vehicle Type During Recession",
            Field::VehicleType,
            Field::AutomobileSales,
            by_type,
        ),
        ChartDescriptor::pie(
            "Total Advertising Expenditure Share by Vehicle Type (Recession)",
            Field::VehicleType,
            Field::AdvertisingExpenditure,
            ad_spend,
        ),
        ChartDescriptor::bar(
            "Effect of Unemployment Rate on Vehicle Type and Sales",
            Field::UnemploymentRate,
            Field::AutomobileSales,
            unemployment,
        )
        .colored_by(Field::VehicleType)
        .with_label(Field::UnemploymentRate, "Unemployment Rate")
        .with_label(Field::AutomobileSales, "Average Automobile Sales"),
    ])
}

fn yearly_report(data: &Dataset, year: i32, options: &BuildOptions) -> Report {
    let all = data.all();
    let yearly_data = all.filter(|r| r.year == year);

    // whole-period trends ignore the selected year
    let by_year = all.group_by(&[Field::Year], Field::AutomobileSales, Reduction::Mean);
    let mut by_month = all.group_by(&[Field::Month], Field::AutomobileSales, Reduction::Sum);
    by_month.order_months(options.month_order);

    let by_type = yearly_data.group_by(&[Field::VehicleType], Field::AutomobileSales, Reduction::Mean);
    let ad_spend = yearly_data.group_by(
        &[Field::VehicleType],
        Field::AdvertisingExpenditure,
        Reduction::Sum,
    );

    Report::from_charts(vec![
        ChartDescriptor::line(
            "Yearly Automobile Sales",
            Field::Year,
            Field::AutomobileSales,
            by_year,
        ),
        ChartDescriptor::line(
            "Total Monthly Automobile Sales",
            Field::Month,
            Field::AutomobileSales,
            by_month,
        ),
        ChartDescriptor::bar(
            format!("Average Vehicles Sold by Vehicle Type in the year {year}"),
            Field::VehicleType,
            Field::AutomobileSales,
            by_type,
        ),
        ChartDescriptor::pie(
            "Total Advertisment Expenditure for Each Vehicle",
            Field::VehicleType,
            Field::AdvertisingExpenditure,
            ad_spend,
        ),
    ])
}
