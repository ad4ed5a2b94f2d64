pub mod aggregate;
pub mod chart;
pub mod dataset;
pub mod gate;
pub mod record;
pub mod report;
pub mod session;

// Flat public surface for domain types and functions.
pub use aggregate::{AggregateRow, AggregateTable, KeyValue, MonthOrder, Reduction};
pub use chart::{ChartDescriptor, ChartKind, Encoding};
pub use dataset::{Dataset, Rows};
pub use gate::year_selector_disabled;
pub use record::{CsvColumn, Field, SalesRecord};
pub use report::{build_report, BuildOptions, Report, ReportType, Selection, YEARS};
pub use session::{SelectionEvent, Session, Update};
