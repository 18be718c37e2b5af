//! Location source that repeats a single fixed coordinate, handy for smoke
//! testing the recording pipeline without a moving track
use super::{sleep_unless_stopped, LocationSource};
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::Sample;
use crate::{set_float_param_from_config, Error};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Emits the same configured coordinate at every sampling interval
#[derive(Debug)]
pub struct StationaryPoint {
    interval_seconds: f64,
    latitude: f64,
    longitude: f64,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl StationaryPoint {
    pub fn new(interval_seconds: f64, latitude: f64, longitude: f64) -> Self {
        StationaryPoint {
            interval_seconds,
            latitude,
            longitude,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl Default for StationaryPoint {
    fn default() -> Self {
        // Seoul station, same landmark the default replay track starts from
        StationaryPoint::new(2.0, 37.55315, 126.972533)
    }
}

impl FromServiceConfig for StationaryPoint {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "interval_seconds" => {
                    set_float_param_from_config!(base, interval_seconds, config, f64)
                }
                "latitude" => set_float_param_from_config!(base, latitude, config, f64),
                "longitude" => set_float_param_from_config!(base, longitude, config, f64),
                _ => warn!(
                    "unknown configuration parameter for StationaryPoint: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }

        Ok(base)
    }
}

impl LocationSource for StationaryPoint {
    fn start_updates(&mut self, sink: Sender<Sample>) -> Result<(), Error> {
        if self.is_running() {
            return Err(Error::SourceUnavailable(
                "stationary source is already delivering updates".to_string(),
            ));
        }
        if self.interval_seconds <= 0.0 {
            return Err(Error::InvalidConfigurationValue(format!(
                "sampling interval must be positive, got {}",
                self.interval_seconds
            )));
        }

        self.stop.store(false, Ordering::Relaxed);
        let stop = Arc::clone(&self.stop);
        let interval = Duration::from_secs_f64(self.interval_seconds);
        let (latitude, longitude) = (self.latitude, self.longitude);
        self.worker = Some(thread::spawn(move || loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            if sink.send(Sample::at_now(latitude, longitude)).is_err() {
                break;
            }
            if !sleep_unless_stopped(interval, &stop) {
                break;
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
