//! Define the application's command line interface
use crate::config::Config;
use simplelog::LevelFilter;
use structopt::StructOpt;

mod record;
use record::{record_command, RecordOpts};
mod show_config;
use show_config::{show_config_command, ShowConfigOpts};

/// Record a GPS trail from the configured location source
#[derive(Debug, StructOpt)]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Commands operating on the recording pipeline
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Run a recording session against the configured location source
    #[structopt(name = "record")]
    Record(RecordOpts),
    /// Print the resolved application configuration
    #[structopt(name = "show-config")]
    ShowConfig(ShowConfigOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Record(opts) => record_command(config, opts),
            Command::ShowConfig(opts) => show_config_command(config, opts),
        }
    }
}
