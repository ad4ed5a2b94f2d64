use super::report::ReportType;

/// Whether the year selector should be disabled for `report_type`.
///
/// Only the yearly report takes a year.
pub fn year_selector_disabled(report_type: ReportType) -> bool {
    report_type != ReportType::YearlyStatistics
}
