use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use time::Month;

pub const DEFAULT_PATH: &str = "weatherdata.csv";

/// Prints the average temperature of a month, the hot days and the number of
/// rainy days found in a CSV file of daily weather observations.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Config {
    /// CSV file with a `date,temperature,humidity,precipitation` header line.
    #[arg(default_value = DEFAULT_PATH)]
    pub path: PathBuf,

    /// Month to average, as a number from 1 to 12.
    #[arg(short, long, default_value = "08", value_parser = parse_month)]
    pub month: Month,

    /// Days strictly above this temperature are reported as hot.
    #[arg(short, long, default_value_t = 30.0, allow_negative_numbers = true)]
    pub threshold: f64,
}

#[derive(Debug, Error)]
pub enum MonthError {
    #[error("`{0}` is not a month number")]
    NotANumber(String),
    #[error(transparent)]
    OutOfRange(#[from] time::error::ComponentRange),
}

/// Accepts `8` as well as `08`.
pub fn parse_month(s: &str) -> Result<Month, MonthError> {
    let number: u8 = s
        .trim()
        .parse()
        .map_err(|_| MonthError::NotANumber(s.to_string()))?;
    Ok(Month::try_from(number)?)
}
