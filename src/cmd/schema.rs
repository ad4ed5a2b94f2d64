//! Schema command - print the CSV input columns and the report JSON format

use crate::domain::{Report, SalesRecord};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema of `report --json` output
    JsonSchema,
    /// CSV header row with the columns read from the dataset
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Report);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        let names: Vec<_> = SalesRecord::csv_columns().iter().map(|c| c.name).collect();
        println!("{}", names.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("CSV Input Format");
        println!("================");
        println!();
        for column in SalesRecord::csv_columns() {
            let req = if column.required { "required" } else { "optional" };
            println!("{:25} ({:8})  {}", column.name, req, column.description);
        }
        println!();
        println!("Other columns are ignored. Rows that fail to parse are skipped.");
        Ok(())
    }
}
