use clap::{Parser, Subcommand};

mod cmd;
mod domain;
mod source;
mod utils;

use cmd::{dashboard::DashboardCommand, report::ReportCommand, schema::SchemaCommand};

#[derive(Parser, Debug)]
#[command(name = "autodash", version, about = "Automobile Sales Statistics Dashboard")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the interactive HTML dashboard
    Dashboard(DashboardCommand),
    /// Print one report's aggregate tables
    Report(ReportCommand),
    /// Print input and output formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Dashboard(cmd) => cmd.exec(),
        Command::Report(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = if verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            };
            builder.filter_level(level);
        }
    }
    builder.init();
}
