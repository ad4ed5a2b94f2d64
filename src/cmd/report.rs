//! Report command - one dashboard view rendered in the terminal

use super::DataArgs;
use crate::domain::{ChartDescriptor, KeyValue, Report, ReportType, SelectionEvent, Session, Update};
use crate::utils::write_csv;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportArg {
    /// Yearly statistics (needs --year)
    Yearly,
    /// Recession period statistics
    Recession,
}

impl From<ReportArg> for ReportType {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Yearly => ReportType::YearlyStatistics,
            ReportArg::Recession => ReportType::RecessionStatistics,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    data: DataArgs,

    /// Type of report to build
    #[arg(short, long, value_enum)]
    report: ReportArg,

    /// Year for the yearly report (1980-2023)
    #[arg(short, long)]
    year: Option<i32>,

    /// Output as JSON instead of formatted tables
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted tables
    #[arg(long)]
    csv: bool,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let dataset = self.data.load()?;
        let mut session = Session::new(dataset, self.data.build_options());

        let year_disabled = Rc::new(Cell::new(true));
        let latest = Rc::new(RefCell::new(Report::default()));
        {
            let year_disabled = Rc::clone(&year_disabled);
            let latest = Rc::clone(&latest);
            session.subscribe(move |update| match update {
                Update::YearSelector { disabled } => year_disabled.set(*disabled),
                Update::Output(report) => *latest.borrow_mut() = report.clone(),
            });
        }

        session.refresh();
        session.dispatch(SelectionEvent::ReportType(ReportType::from(self.report)));
        if self.year.is_some() && year_disabled.get() {
            log::warn!(
                "--year is ignored for {}",
                session.selection().report_type.label()
            );
        }
        session.dispatch(SelectionEvent::Year(self.year));
        log::debug!("Selection: {:?}", session.selection());

        let report = latest.take();
        if report.is_empty() {
            println!("Nothing to show: select a year with --year");
            return Ok(());
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        } else if self.csv {
            write_csv(csv_rows(&report), io::stdout())
        } else {
            print_tables(&report);
            Ok(())
        }
    }
}

fn print_tables(report: &Report) {
    for chart in report.charts() {
        println!("{} [{}]", chart.title, chart.kind);

        if chart.table.is_empty() {
            println!("No data\n");
            continue;
        }

        let mut builder = Builder::default();
        builder.push_record(header(chart));
        for row in &chart.table.rows {
            let mut record: Vec<String> = row.key.iter().map(|k| format_key(k.as_ref())).collect();
            record.push(format_value(row.value));
            builder.push_record(record);
        }

        let table = builder
            .build()
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}\n", table);
    }
}

fn header(chart: &ChartDescriptor) -> Vec<String> {
    let table = &chart.table;
    let mut columns: Vec<String> = table
        .keys
        .iter()
        .map(|f| chart.label(*f).to_string())
        .collect();
    columns.push(format!("{}({})", table.reduction, chart.label(table.value)));
    columns
}

fn format_key(key: Option<&KeyValue>) -> String {
    key.map_or_else(|| "(missing)".to_string(), ToString::to_string)
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Long-format CSV row, one per aggregate group
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    chart: usize,
    title: &'a str,
    kind: String,
    key: String,
    reduction: String,
    field: &'static str,
    value: Option<f64>,
}

fn csv_rows(report: &Report) -> Vec<CsvRow<'_>> {
    report
        .charts()
        .enumerate()
        .flat_map(|(idx, chart)| {
            chart.table.rows.iter().map(move |row| CsvRow {
                chart: idx + 1,
                title: &chart.title,
                kind: chart.kind.to_string(),
                key: row
                    .key
                    .iter()
                    .map(|k| format_key(k.as_ref()))
                    .collect::<Vec<_>>()
                    .join("|"),
                reduction: chart.table.reduction.to_string(),
                field: chart.table.value.column(),
                value: row.value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::record;
    use crate::domain::{build_report, BuildOptions, Dataset, Selection};

    fn report() -> Report {
        let data: Dataset = vec![
            record(1980, "Jan", true, "Car", 10.0, 100.0, 7.0),
            record(1980, "Feb", true, "Car", 20.0, 50.0, 7.0),
        ]
        .into_iter()
        .collect();
        build_report(&data, &Selection::recession(), &BuildOptions::default())
    }

    #[test]
    fn header_uses_labels() {
        let report = report();
        let effect = &report.rows[1][1];
        assert_eq!(
            header(effect),
            vec![
                "Unemployment Rate".to_string(),
                "Vehicle_Type".to_string(),
                "mean(Average Automobile Sales)".to_string()
            ]
        );
    }

    #[test]
    fn csv_rows_flatten_all_charts() {
        let report = report();
        let rows = csv_rows(&report);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].chart, 1);
        assert_eq!(rows[0].key, "1980");
        assert_eq!(rows[0].value, Some(15.0));
        assert_eq!(rows[2].kind, "pie");
        assert_eq!(rows[2].value, Some(150.0));
        assert_eq!(rows[3].key, "7|Car");
    }

    #[test]
    fn missing_values_formatting() {
        assert_eq!(format_key(None), "(missing)");
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(2.0 / 3.0)), "0.67");
    }
}
