use clap::Parser;
use weather_stats::{config::Config, Summary};

fn main() -> miette::Result<()> {
    env_logger::init();
    let config = Config::parse();

    let entries = weather_stats::load(&config.path)?;
    let summary = Summary::compute(&entries, config.month, config.threshold);
    println!("{summary}");

    Ok(())
}
