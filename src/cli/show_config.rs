//! Define the configuration inspection command
use crate::config::Config;
use log::info;
use structopt::StructOpt;

/// Print the application configuration after defaults have been applied
#[derive(Debug, StructOpt)]
pub struct ShowConfigOpts {
    /// Also construct the configured service handlers to validate them
    #[structopt(long)]
    check: bool,
}

/// Implementation of the `show-config` subcommand
pub fn show_config_command(
    config: Config,
    opts: ShowConfigOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_yaml::to_string(&config)?);
    if opts.check {
        config.get_location_handler()?;
        config.get_presentation_handler()?;
        info!("service handlers resolved successfully");
    }
    Ok(())
}
