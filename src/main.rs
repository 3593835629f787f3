mod cli;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Resample { args } => match command::resample(args).await {
            Ok(dir) => println!("Files saved to `{}`", dir),
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Compare {
            args,
            percentages,
            min_years_list,
            statistics,
        } => {
            match command::compare(args, percentages, min_years_list, statistics).await {
                Ok(filename) => println!("File saved to `{}`", filename),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }

    Ok(())
}
