//! Record a GPS trail as a polyline with start and waypoint markers.
//!
//! The tracker core is a small state machine that accumulates location fixes
//! into an append-only trail, location sources and presentation backends are
//! pluggable services wired together by a lifecycle controller.
use std::fs::File;
use std::io::ErrorKind;
use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod controller;
mod error;
pub mod gps;
pub mod services;
pub mod tracker;

pub use config::Config;
pub use controller::LifecycleController;
pub use error::Error;
pub use gps::{Location, Sample};
pub use tracker::{Marker, MarkerKind, RecordingState, RouteSnapshot, RouteTracker};

static CONFIG_FILE_NAME: &str = "trail-tracker.yml";

/// Location of the application's YAML configuration file
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(PathBuf::new)
        .join(CONFIG_FILE_NAME)
}

/// Read the configuration file, falling back to the defaults when none exists
pub fn load_config() -> Result<Config, Error> {
    match File::open(config_path()) {
        Ok(mut fp) => Ok(Config::load(&mut fp)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}
