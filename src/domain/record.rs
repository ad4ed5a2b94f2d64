use super::aggregate::KeyValue;
use autodash_derive::CsvColumns;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Dataset column that reports group or reduce by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Field {
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "Month")]
    Month,
    #[serde(rename = "Recession")]
    Recession,
    #[serde(rename = "Automobile_Sales")]
    AutomobileSales,
    #[serde(rename = "Vehicle_Type")]
    VehicleType,
    #[serde(rename = "Advertising_Expenditure")]
    AdvertisingExpenditure,
    #[serde(rename = "unemployment_rate")]
    UnemploymentRate,
}

impl Field {
    #[cfg(test)]
    pub const ALL: [Field; 7] = [
        Field::Year,
        Field::Month,
        Field::Recession,
        Field::AutomobileSales,
        Field::VehicleType,
        Field::AdvertisingExpenditure,
        Field::UnemploymentRate,
    ];

    /// Column name in the source CSV
    pub fn column(self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::Month => "Month",
            Field::Recession => "Recession",
            Field::AutomobileSales => "Automobile_Sales",
            Field::VehicleType => "Vehicle_Type",
            Field::AdvertisingExpenditure => "Advertising_Expenditure",
            Field::UnemploymentRate => "unemployment_rate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Column description generated by `#[derive(CsvColumns)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// One row of the automobile sales dataset.
///
/// Columns of the source file not listed here (Date, GDP, City, ...) are
/// ignored on read.
#[derive(Debug, Clone, PartialEq, Deserialize, CsvColumns)]
pub struct SalesRecord {
    /// Calendar year of the observation
    #[serde(rename = "Year")]
    pub year: i32,
    /// Month label, e.g. Jan
    #[serde(rename = "Month", default, deserialize_with = "optional_label")]
    pub month: Option<String>,
    /// 1 during a recession period, 0 otherwise
    #[serde(rename = "Recession", deserialize_with = "recession_flag")]
    pub recession: bool,
    /// Number of automobiles sold
    #[serde(rename = "Automobile_Sales", default, deserialize_with = "optional_number")]
    pub automobile_sales: Option<f64>,
    /// Vehicle category, e.g. Supperminicar or Sports
    #[serde(rename = "Vehicle_Type", default, deserialize_with = "optional_label")]
    pub vehicle_type: Option<String>,
    /// Advertising spend for the period
    #[serde(
        rename = "Advertising_Expenditure",
        default,
        deserialize_with = "optional_number"
    )]
    pub advertising_expenditure: Option<f64>,
    /// Unemployment rate in percent
    #[serde(rename = "unemployment_rate", default, deserialize_with = "optional_number")]
    pub unemployment_rate: Option<f64>,
}

impl SalesRecord {
    /// Grouping key for `field`. `None` marks a missing value, which groups on its own.
    pub fn key(&self, field: Field) -> Option<KeyValue> {
        match field {
            Field::Year => Some(KeyValue::Int(self.year.into())),
            Field::Recession => Some(KeyValue::Int(self.recession.into())),
            Field::Month => self.month.clone().map(KeyValue::Text),
            Field::VehicleType => self.vehicle_type.clone().map(KeyValue::Text),
            Field::AutomobileSales | Field::AdvertisingExpenditure | Field::UnemploymentRate => {
                self.number(field).map(KeyValue::Float)
            }
        }
    }

    /// Numeric value of `field`; `None` for labels and missing cells.
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Year => Some(self.year.into()),
            Field::Recession => Some(if self.recession { 1.0 } else { 0.0 }),
            Field::AutomobileSales => self.automobile_sales,
            Field::AdvertisingExpenditure => self.advertising_expenditure,
            Field::UnemploymentRate => self.unemployment_rate,
            Field::Month | Field::VehicleType => None,
        }
    }
}

fn recession_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(raw.trim())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid recession flag: {raw}")))
}

/// Cell contents read as a missing value, matching the usual CSV tooling defaults.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_na(raw: &str) -> bool {
    NA_TOKENS.contains(&raw)
}

fn optional_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !is_na(s)))
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None => Ok(None),
        Some(s) if is_na(s) => Ok(None),
        Some(s) => parse_number(s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid number: {s}"))),
    }
}

/// `None` for text that isn't a number, `Some(None)` for infinities.
fn parse_number(raw: &str) -> Option<Option<f64>> {
    raw.parse::<f64>().ok().map(|v| Some(v).filter(|v| v.is_finite()))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        other => other.parse::<f64>().ok().map(|v| v == 1.0),
    }
}

#[cfg(test)]
pub(crate) fn record(
    year: i32,
    month: &str,
    recession: bool,
    vehicle_type: &str,
    sales: f64,
    ad_spend: f64,
    unemployment: f64,
) -> SalesRecord {
    SalesRecord {
        year,
        month: Some(month.to_string()),
        recession,
        automobile_sales: Some(sales),
        vehicle_type: Some(vehicle_type.to_string()),
        advertising_expenditure: Some(ad_spend),
        unemployment_rate: Some(unemployment),
    }
}
