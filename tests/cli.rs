//! E2E tests for the report, dashboard and schema commands

use serde_json::Value;
use std::process::{Command, Output};

const SALES: &str = "tests/data/sales.csv";
const MALFORMED: &str = "tests/data/malformed.csv";

fn autodash(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_autodash"))
        .args(args)
        .env_remove("AUTODASH_DATA")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn report_json(args: &[&str]) -> Value {
    let output = autodash(args);
    assert!(output.status.success(), "Command failed: {:?}", output);
    serde_json::from_str(&stdout(&output)).expect("valid json")
}

/// Finds the value of the group whose key equals `key` in a chart's table
fn group_value(chart: &Value, key: Value) -> Option<Value> {
    chart["table"]["rows"]
        .as_array()?
        .iter()
        .find(|row| row["key"] == key)
        .map(|row| row["value"].clone())
}

#[test]
fn recession_report_tables() {
    let output = autodash(&["report", "--data", SALES, "--report", "recession"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Automobile Sales Fluctuation Over Recession Period (Year-wise)"));
    assert!(stdout.contains("Average Automobile Sales by Vehicle Type During Recession"));
    assert!(stdout.contains("Total Advertising Expenditure Share by Vehicle Type (Recession)"));
    assert!(stdout.contains("Effect of Unemployment Rate on Vehicle Type and Sales"));
    assert!(stdout.contains("Unemployment Rate"));
    // Supperminicar mean over 456.0, 702.8 and 380.2
    assert!(stdout.contains("513.00"));
}

#[test]
fn recession_report_only_recession_rows() {
    let json = report_json(&["report", "--data", SALES, "--report", "recession", "--json"]);
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.as_array().unwrap().len() == 2));

    let years: Vec<_> = json["rows"][0][0]["table"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["key"][0].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![1980, 1981, 2008, 2009]);

    let by_type = &json["rows"][0][1];
    assert_eq!(group_value(by_type, serde_json::json!(["Executivecar"])), None);
    assert_eq!(
        group_value(by_type, serde_json::json!(["Sports"])),
        Some(serde_json::json!(330.5))
    );
}

#[test]
fn recession_report_ignores_year() {
    let with_year = report_json(&[
        "report", "--data", SALES, "--report", "recession", "--year", "2000", "--json",
    ]);
    let without = report_json(&["report", "--data", SALES, "--report", "recession", "--json"]);
    assert_eq!(with_year, without);
}

#[test]
fn yearly_report_for_selected_year() {
    let json = report_json(&[
        "report", "--data", SALES, "--report", "yearly", "--year", "2000", "--json",
    ]);

    let by_type = &json["rows"][1][0];
    assert!(by_type["title"].as_str().unwrap().contains("2000"));
    assert_eq!(by_type["table"]["rows"].as_array().unwrap().len(), 3);
    assert_eq!(
        group_value(by_type, serde_json::json!(["Supperminicar"])),
        Some(serde_json::json!(2400.0))
    );

    let ad_spend = &json["rows"][1][1];
    assert_eq!(ad_spend["kind"], "pie");
    assert_eq!(
        group_value(ad_spend, serde_json::json!(["Supperminicar"])),
        Some(serde_json::json!(5400.0))
    );

    // whole-period chart covers every year in the file
    assert_eq!(json["rows"][0][0]["table"]["rows"].as_array().unwrap().len(), 6);
}

#[test]
fn yearly_month_order() {
    let months = |extra: &[&str]| -> Vec<String> {
        let mut args = vec!["report", "--data", SALES, "--report", "yearly", "--year", "1980", "--json"];
        args.extend_from_slice(extra);
        let json = report_json(&args);
        json["rows"][0][1]["table"]["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["key"][0].as_str().unwrap().to_string())
            .collect()
    };

    assert_eq!(
        months(&[]),
        vec!["Apr", "Dec", "Feb", "Jan", "Jun", "Mar", "May"]
    );
    assert_eq!(
        months(&["--calendar-months"]),
        vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Dec"]
    );
}

#[test]
fn yearly_report_without_year_is_empty() {
    let output = autodash(&["report", "--data", SALES, "--report", "yearly"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("Nothing to show"));
}

#[test]
fn yearly_report_out_of_range_year() {
    let json = report_json(&[
        "report", "--data", SALES, "--report", "yearly", "--year", "1975", "--json",
    ]);
    assert_eq!(json["rows"][1][0]["table"]["rows"].as_array().unwrap().len(), 0);
    assert_eq!(json["rows"][1][1]["table"]["rows"].as_array().unwrap().len(), 0);
}

#[test]
fn report_csv_output() {
    let output = autodash(&["report", "--data", SALES, "--report", "recession", "--csv"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("chart,title,kind,key,reduction,field,value"));
    assert!(stdout.contains("pie"));
    assert!(stdout.contains("Supperminicar"));
}

#[test]
fn malformed_rows_are_skipped() {
    let json = report_json(&["report", "--data", MALFORMED, "--report", "recession", "--json"]);
    let by_type = &json["rows"][0][1];
    let rows = by_type["table"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // missing vehicle types form their own group, ordered first
    assert_eq!(rows[0]["key"], serde_json::json!([null]));
    assert_eq!(rows[0]["value"], serde_json::json!(300.0));
    assert_eq!(
        group_value(by_type, serde_json::json!(["Sports"])),
        Some(serde_json::json!(100.0))
    );
}

#[test]
fn missing_data_file_fails() {
    let output = autodash(&["report", "--data", "tests/data/nope.csv", "--report", "recession"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tests/data/nope.csv"));
}

#[test]
fn dashboard_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.html");
    let output = autodash(&[
        "dashboard",
        "--data",
        SALES,
        "--output",
        path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Automobile Sales Statistics Dashboard"));
    assert!(html.contains("Recession Period Statistics"));
    assert!(html.contains("Average Vehicles Sold by Vehicle Type in the year 2023"));
    assert!(html.contains(r#""records":13"#));
}

#[test]
fn schema_csv_header() {
    let output = autodash(&["schema", "csv-header"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout(&output).trim(),
        "Year,Month,Recession,Automobile_Sales,Vehicle_Type,Advertising_Expenditure,unemployment_rate"
    );
}

#[test]
fn schema_json_describes_report() {
    let json = report_json(&["schema", "json-schema"]);
    assert_eq!(json["title"], "Report");
    assert!(json["definitions"]["ChartDescriptor"].is_object());
}
