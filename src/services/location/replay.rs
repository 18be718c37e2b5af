//! Location source that replays a fixed list of coordinates at a set cadence
use super::{sleep_unless_stopped, LocationSource};
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::Sample;
use crate::{set_float_param_from_config, Error};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Built in track looping through a handful of Seoul subway stations,
/// used when no coordinate list is configured
static DEFAULT_TRACK: &[(f64, f64)] = &[
    (37.55315, 126.972533),
    (37.561159, 127.035505),
    (37.540408, 127.069231),
    (37.54718, 127.047413),
    (37.496068, 127.028506),
    (37.394726159, 127.111209047),
];

/// Emits samples by cycling through a configured coordinate list
#[derive(Debug)]
pub struct ReplayTrack {
    interval_seconds: f64,
    coordinates: Vec<(f64, f64)>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ReplayTrack {
    pub fn new(interval_seconds: f64, coordinates: Vec<(f64, f64)>) -> Self {
        ReplayTrack {
            interval_seconds,
            coordinates,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl Default for ReplayTrack {
    fn default() -> Self {
        ReplayTrack::new(2.0, DEFAULT_TRACK.to_vec())
    }
}

impl FromServiceConfig for ReplayTrack {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "interval_seconds" => {
                    set_float_param_from_config!(base, interval_seconds, config, f64)
                }
                "coordinates" => {
                    base.coordinates = parse_coordinate_list(config, "coordinates")?
                }
                _ => warn!(
                    "unknown configuration parameter for ReplayTrack: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }

        Ok(base)
    }
}

impl LocationSource for ReplayTrack {
    fn start_updates(&mut self, sink: Sender<Sample>) -> Result<(), Error> {
        if self.is_running() {
            return Err(Error::SourceUnavailable(
                "replay source is already delivering updates".to_string(),
            ));
        }
        if self.coordinates.is_empty() {
            return Err(Error::SourceUnavailable(
                "replay source has no coordinates to deliver".to_string(),
            ));
        }
        if self.interval_seconds <= 0.0 {
            return Err(Error::InvalidConfigurationValue(format!(
                "replay interval must be positive, got {}",
                self.interval_seconds
            )));
        }

        self.stop.store(false, Ordering::Relaxed);
        let stop = Arc::clone(&self.stop);
        let interval = Duration::from_secs_f64(self.interval_seconds);
        let coordinates = self.coordinates.clone();
        self.worker = Some(thread::spawn(move || {
            for &(latitude, longitude) in coordinates.iter().cycle() {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                debug!("delivering location fix: {}, {}", latitude, longitude);
                if sink.send(Sample::at_now(latitude, longitude)).is_err() {
                    // receiver is gone, nobody is listening anymore
                    break;
                }
                if !sleep_unless_stopped(interval, &stop) {
                    break;
                }
            }
        }));
        Ok(())
    }

    fn stop_updates(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some() && !self.stop.load(Ordering::Relaxed)
    }
}

/// Parse a `[[lat, long], ...]` configuration value into coordinate pairs
fn parse_coordinate_list(
    config: &ServiceConfig,
    key: &str,
) -> Result<Vec<(f64, f64)>, Error> {
    let invalid = || {
        Error::InvalidConfigurationValue(format!(
            "invalid value for {}.{}, expected a list of [latitude, longitude] pairs: {:?}",
            config.handler(),
            key,
            config.get_parameter(key)
        ))
    };
    let entries = config
        .get_parameter(key)
        .and_then(|v| v.as_sequence())
        .ok_or_else(invalid)?;
    let mut coordinates = Vec::with_capacity(entries.len());
    for entry in entries {
        let pair = entry.as_sequence().ok_or_else(invalid)?;
        if pair.len() != 2 {
            return Err(invalid());
        }
        let latitude = pair[0].as_f64().ok_or_else(invalid)?;
        let longitude = pair[1].as_f64().ok_or_else(invalid)?;
        coordinates.push((latitude, longitude));
    }
    Ok(coordinates)
}
