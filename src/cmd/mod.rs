pub mod dashboard;
pub mod report;
pub mod schema;

use crate::domain::{BuildOptions, Dataset, MonthOrder};
use crate::source::{self, DEFAULT_SOURCE};
use clap::Args;
use std::sync::Arc;

/// Options shared by commands that read the sales dataset
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// CSV file or http(s) URL with automobile sales records
    #[arg(short, long, env = "AUTODASH_DATA", default_value = DEFAULT_SOURCE)]
    data: String,

    /// Order monthly totals Jan..Dec instead of alphabetically
    #[arg(long)]
    calendar_months: bool,
}

impl DataArgs {
    /// Load the dataset once; every consumer shares the same read-only copy.
    pub fn load(&self) -> anyhow::Result<Arc<Dataset>> {
        let dataset = source::load(&self.data)?;
        if dataset.is_empty() {
            log::warn!("No sales records in {}", self.data);
        }
        Ok(Arc::new(dataset))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            month_order: if self.calendar_months {
                MonthOrder::Calendar
            } else {
                MonthOrder::Lexical
            },
        }
    }
}
