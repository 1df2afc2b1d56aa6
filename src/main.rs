use clap::Parser;
use tracing_subscriber::EnvFilter;

use pairscan::cli::{BacktestCliConfig, Cli, Commands, ScanCliConfig};
use pairscan::commands::{run_backtest, run_scan_command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize structured logging; --verbose sets the default filter,
    // RUST_LOG still wins when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.verbose.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Backtest {
            symbol_a,
            symbol_b,
            data_dir,
            synthetic,
            start,
            end,
            confidence,
            max_half_life,
            leverage,
            strict_out_of_sample,
            output_dir,
        } => {
            let config = BacktestCliConfig::from_args(
                symbol_a,
                symbol_b,
                data_dir,
                *synthetic,
                start,
                end,
                *confidence,
                *max_half_life,
                *leverage,
                *strict_out_of_sample,
                output_dir,
            )?;
            run_backtest(config)?;
        }
        Commands::Scan {
            config,
            sectors,
            data_dir,
            synthetic,
            confidence,
            max_half_life,
            leverage,
            start,
            end,
            strict_out_of_sample,
            sequential,
            output_dir,
        } => {
            let config = ScanCliConfig::from_args(
                config.as_deref(),
                sectors,
                data_dir,
                *synthetic,
                *confidence,
                *max_half_life,
                *leverage,
                start.as_deref(),
                end.as_deref(),
                *strict_out_of_sample,
                *sequential,
                output_dir,
            )?;
            run_scan_command(config)?;
        }
    }

    Ok(())
}
