mod cli;
mod error;
mod settings;

use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::cli::{Args, Commands};
use crate::error::Result;
use crate::settings::Settings;
use radiorec_engine::{RecorderConfig, RecordingRequest, record};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        error!("application error: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;

    match args.command {
        Commands::List => {
            for name in settings.station_names() {
                println!("{name}");
            }
        }

        Commands::Record {
            station,
            duration,
            name,
            public,
        } => {
            let stream_url = settings.station_url(&station)?.to_owned();
            let request = RecordingRequest {
                station,
                stream_url,
                target_dir: settings.target_dir(),
                name,
                duration: Duration::from_secs(duration * 60),
                public_file: public,
            };

            let summary = record(request, RecorderConfig::default()).await?;

            info!(
                attempts = summary.attempts,
                bytes = summary.bytes_written,
                elapsed_secs = summary.elapsed.as_secs_f64(),
                "recording finished"
            );
            for file in &summary.files {
                println!("{}", file.display());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
