use speech_scraper_lib::cli::Cli;
use speech_scraper_lib::{logger, pipeline, InterruptFlag, Result, RunSummary, ScrapeError, SpeechApi};

use std::process::ExitCode;
use clap::Parser;
use log::{error, info, warn};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help / --version land here too
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    logger::init(cli.verbose);
    info!("Starting speech scraper...");

    let interrupt = InterruptFlag::new();
    if let Err(e) = interrupt.install() {
        warn!("Could not install interrupt handler: {}", e);
    }

    match run(&cli, &interrupt) {
        Ok(summary) => {
            for (keyword, fetched) in &summary.per_keyword {
                info!("  '{}': {} records", keyword, fetched);
            }
            match &summary.output {
                Some(path) => info!(
                    "Done. {} unique records written to {} ({} duplicates skipped).",
                    summary.written,
                    path.display(),
                    summary.duplicates_skipped
                ),
                None => info!("Done. No records found."),
            }
            ExitCode::SUCCESS
        }
        Err(ScrapeError::Interrupted) => {
            warn!("Interrupted, no output written.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, interrupt: &InterruptFlag) -> Result<RunSummary> {
    // Validate before touching the network
    let range = cli.date_range()?;
    let config = cli.fetch_config();
    let api = SpeechApi::new(config.clone())?;
    pipeline::run(&api, &cli.keywords, &range, &config, &cli.output, interrupt)
}
