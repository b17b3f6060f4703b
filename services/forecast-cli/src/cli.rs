use crate::commands::{run_forecast, run_history, ForecastArgs, HistoryArgs};
use clap::{Parser, Subcommand};
use immunization_forecast::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Immunization Forecast",
    about = "Apply local override rules to decision support vaccine forecasts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forecast every series for a patient schedule export
    Forecast(ForecastArgs),
    /// Merge dose annotations from a schedule export onto raw immunization rows
    History(HistoryArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Forecast(args) => run_forecast(args),
        Command::History(args) => run_history(args),
    }
}
