mod cli;
mod commands;
mod infra;

use immunization_forecast::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
