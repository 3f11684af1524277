use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Records internet radio streams.
#[derive(Debug, Parser)]
#[command(name = "radiorec", version, about)]
pub struct Args {
    /// Path to an alternate settings file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a station for a fixed number of minutes.
    Record {
        /// Name of the radio station (see the settings file for a list).
        station: String,

        /// Recording time in minutes.
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        duration: u64,

        /// A name for the recording, appended to the output filename.
        name: Option<String>,

        /// Make the output files world-readable and writable.
        #[arg(short, long)]
        public: bool,
    },

    /// List all known radio stations.
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn record_requires_a_positive_duration() {
        assert!(Args::try_parse_from(["radiorec", "record", "dlf", "0"]).is_err());
        assert!(Args::try_parse_from(["radiorec", "record", "dlf", "abc"]).is_err());
        assert!(Args::try_parse_from(["radiorec", "record", "dlf", "60"]).is_ok());
    }

    #[test]
    fn record_accepts_name_and_flags() {
        let args =
            Args::try_parse_from(["radiorec", "record", "dlf", "30", "nachrichten", "-p", "-v"])
                .unwrap();
        assert!(args.verbose);
        match args.command {
            Commands::Record {
                station,
                duration,
                name,
                public,
            } => {
                assert_eq!(station, "dlf");
                assert_eq!(duration, 30);
                assert_eq!(name.as_deref(), Some("nachrichten"));
                assert!(public);
            }
            Commands::List => panic!("expected record command"),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["radiorec", "list", "-v", "-q"]).is_err());
    }
}
