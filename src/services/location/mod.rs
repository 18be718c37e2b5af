//! Location sources that deliver periodic GPS fixes over a channel
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::Sample;
use crate::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod replay;
pub use replay::ReplayTrack;
mod stationary;
pub use stationary::StationaryPoint;

/// Trait that defines how periodic location fixes get delivered to the application.
///
/// A source runs on its own thread and pushes samples into the channel it was
/// started with; it never touches tracker state directly. Stopping the source
/// is the only cancellation mechanism, a sample already queued when the stop
/// request lands is discarded downstream.
pub trait LocationSource {
    /// Begin delivering samples into the provided channel
    fn start_updates(&mut self, sink: Sender<Sample>) -> Result<(), Error>;

    /// Stop delivering samples, waiting for the sampling thread to exit
    fn stop_updates(&mut self);

    /// True while the sampling thread is delivering updates
    fn is_running(&self) -> bool;
}

/// Create a boxed location source from the "location" service configuration
pub fn new_location_handler(config: &ServiceConfig) -> Result<Box<dyn LocationSource>, Error> {
    match config.handler() {
        "replay" => Ok(Box::new(ReplayTrack::from_config(config)?)),
        "stationary" => Ok(Box::new(StationaryPoint::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no location handler exists for: {}",
            config.handler()
        ))),
    }
}

/// Sleep for the sampling interval in short slices so a stop request does not
/// have to wait out a long cadence (the interval can be a minute or more).
/// Returns false if the stop flag was raised while sleeping.
pub(crate) fn sleep_unless_stopped(interval: Duration, stop: &Arc<AtomicBool>) -> bool {
    let slice = Duration::from_millis(100);
    let mut remaining = interval;
    while remaining > Duration::from_millis(0) {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let nap = remaining.min(slice);
        thread::sleep(nap);
        remaining -= nap;
    }
    !stop.load(Ordering::Relaxed)
}
