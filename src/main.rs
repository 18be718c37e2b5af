use log::trace;
use simplelog::{Config as LoggerConfig, TermLogger, TerminalMode};
use structopt::StructOpt;
use trail_tracker::cli::Cli;
use trail_tracker::{config_path, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();
    let config = load_config()?;
    let level_filter = opt.verbosity(config.log_level());
    TermLogger::init(level_filter, LoggerConfig::default(), TerminalMode::Mixed)?;
    trace!("using configuration file location: {:?}", config_path());

    // execute the requested subcommand
    opt.execute_subcommand(config)
}
