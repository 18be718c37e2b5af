//! Wires the location source, route tracker and presentation services together
//!
//! The controller owns the tracker behind a single mutex so state transitions
//! and sample recording are linearized, the source thread only ever touches
//! the sample channel.
use crate::config::Config;
use crate::gps::Sample;
use crate::services::{LocationSource, RoutePresenter};
use crate::tracker::{RecordingState, RouteSnapshot, RouteTracker};
use crate::Error;
use log::{error, info, warn};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub struct LifecycleController {
    tracker: Arc<Mutex<RouteTracker>>,
    source: Box<dyn LocationSource>,
    presenters: Vec<Box<dyn RoutePresenter>>,
    sample_tx: Sender<Sample>,
    sample_rx: Receiver<Sample>,
}

impl LifecycleController {
    /// Create a controller from explicitly injected collaborators
    pub fn new(source: Box<dyn LocationSource>, presenters: Vec<Box<dyn RoutePresenter>>) -> Self {
        let (sample_tx, sample_rx) = channel();
        LifecycleController {
            tracker: Arc::new(Mutex::new(RouteTracker::new())),
            source,
            presenters,
            sample_tx,
            sample_rx,
        }
    }

    /// Create a controller with the location and presentation handlers named
    /// in the application configuration
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let source = config.get_location_handler()?;
        let presenter = config.get_presentation_handler()?;
        Ok(LifecycleController::new(source, vec![presenter]))
    }

    fn lock_tracker(&self) -> Result<MutexGuard<'_, RouteTracker>, Error> {
        self.tracker
            .lock()
            .map_err(|_| Error::Other("route tracker state is poisoned".to_string()))
    }

    /// Begin a recording session and start the location source.
    ///
    /// If the source cannot start (no fixes will ever arrive) the tracker is
    /// rolled back to idle so the session does not hang half-open.
    pub fn user_requests_start(&mut self) -> Result<(), Error> {
        self.lock_tracker()?.start()?;
        if let Err(e) = self.source.start_updates(self.sample_tx.clone()) {
            self.lock_tracker()?.stop();
            return Err(e);
        }
        info!("location updates started");
        Ok(())
    }

    /// Stop the location source first, then end the recording session.
    ///
    /// Fixes already queued on the channel are drained as stale no-ops by the
    /// tracker on the next pump.
    pub fn user_requests_stop(&mut self) -> Result<(), Error> {
        self.source.stop_updates();
        if self.lock_tracker()?.stop() {
            info!("location updates stopped");
        } else {
            warn!("stop requested but no recording session was active");
        }
        Ok(())
    }

    /// Clear the recorded trail, only permitted while idle.
    ///
    /// Presenters are re-rendered with the now empty snapshot so they release
    /// whatever overlays they had drawn.
    pub fn user_requests_reset(&mut self) -> Result<(), Error> {
        self.lock_tracker()?.reset()?;
        info!("recorded trail cleared");
        self.render_snapshot()
    }

    /// Hand queued samples to the tracker, re-rendering after each recorded
    /// one. Waits up to `timeout` for the first sample then drains whatever
    /// else is already queued. Returns the number of samples recorded.
    pub fn pump_samples(&mut self, timeout: Duration) -> Result<usize, Error> {
        let mut recorded = 0;
        let first = match self.sample_rx.recv_timeout(timeout) {
            Ok(sample) => Some(sample),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => None,
        };
        if let Some(sample) = first {
            if self.record_one(sample)? {
                recorded += 1;
            }
            loop {
                match self.sample_rx.try_recv() {
                    Ok(sample) => {
                        if self.record_one(sample)? {
                            recorded += 1;
                        }
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
        }
        Ok(recorded)
    }

    fn record_one(&mut self, sample: Sample) -> Result<bool, Error> {
        let recorded = self.lock_tracker()?.record_sample(sample);
        if recorded {
            self.render_snapshot()?;
        }
        Ok(recorded)
    }

    /// Liveness of the sampling thread, replaces any need to poke at the
    /// process or thread list from the UI layer
    pub fn is_source_running(&self) -> bool {
        self.source.is_running()
    }

    pub fn recording_state(&self) -> Result<RecordingState, Error> {
        Ok(self.lock_tracker()?.state())
    }

    pub fn snapshot(&self) -> Result<RouteSnapshot, Error> {
        Ok(self.lock_tracker()?.snapshot())
    }

    /// Push the current snapshot to every presenter, a failing presenter is
    /// advisory only and never corrupts the recording session
    pub fn render_snapshot(&self) -> Result<(), Error> {
        let snapshot = self.lock_tracker()?.snapshot();
        for presenter in &self.presenters {
            if let Err(e) = presenter.render(&snapshot) {
                error!("presentation service failed to render the trail: {}", e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::Location;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that delivers a fixed set of fixes synchronously on start and
    /// hands its sink back to the test for injecting late samples
    struct ScriptedSource {
        samples: Vec<Sample>,
        sink: Arc<Mutex<Option<Sender<Sample>>>>,
        running: bool,
    }

    impl ScriptedSource {
        fn new(samples: Vec<Sample>) -> (Self, Arc<Mutex<Option<Sender<Sample>>>>) {
            let sink = Arc::new(Mutex::new(None));
            (
                ScriptedSource {
                    samples,
                    sink: Arc::clone(&sink),
                    running: false,
                },
                sink,
            )
        }
    }

    impl LocationSource for ScriptedSource {
        fn start_updates(&mut self, sink: Sender<Sample>) -> Result<(), Error> {
            for sample in &self.samples {
                sink.send(*sample).unwrap();
            }
            *self.sink.lock().unwrap() = Some(sink);
            self.running = true;
            Ok(())
        }

        fn stop_updates(&mut self) {
            self.running = false;
        }

        fn is_running(&self) -> bool {
            self.running
        }
    }

    /// Source standing in for a provider that was never authorized
    struct UnavailableSource;

    impl LocationSource for UnavailableSource {
        fn start_updates(&mut self, _sink: Sender<Sample>) -> Result<(), Error> {
            Err(Error::SourceUnavailable(
                "location permission was never granted".to_string(),
            ))
        }

        fn stop_updates(&mut self) {}

        fn is_running(&self) -> bool {
            false
        }
    }

    struct CountingPresenter {
        renders: Arc<AtomicUsize>,
    }

    impl RoutePresenter for CountingPresenter {
        fn render(&self, _snapshot: &RouteSnapshot) -> Result<(), Box<dyn std::error::Error>> {
            self.renders.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn scripted_controller(
        samples: Vec<Sample>,
    ) -> (
        LifecycleController,
        Arc<Mutex<Option<Sender<Sample>>>>,
        Arc<AtomicUsize>,
    ) {
        let (source, sink) = ScriptedSource::new(samples);
        let renders = Arc::new(AtomicUsize::new(0));
        let presenter = CountingPresenter {
            renders: Arc::clone(&renders),
        };
        let controller = LifecycleController::new(Box::new(source), vec![Box::new(presenter)]);
        (controller, sink, renders)
    }

    #[test]
    fn recording_session_records_and_renders_samples() {
        let (mut controller, _sink, renders) = scripted_controller(vec![
            Sample::at_now(37.5, 127.0),
            Sample::at_now(37.6, 127.1),
        ]);

        controller.user_requests_start().unwrap();
        assert!(controller.is_source_running());
        let recorded = controller.pump_samples(Duration::from_millis(100)).unwrap();
        assert_eq!(recorded, 2);
        assert_eq!(renders.load(Ordering::Relaxed), 2);

        let snapshot = controller.snapshot().unwrap();
        assert_eq!(snapshot.coordinates().len(), 3);
        assert_eq!(
            snapshot.coordinates()[2],
            Location::new(37.6, 127.1)
        );

        controller.user_requests_stop().unwrap();
        assert!(!controller.is_source_running());
        assert_eq!(
            controller.recording_state().unwrap(),
            RecordingState::Idle
        );
    }

    #[test]
    fn late_samples_after_stop_are_discarded() {
        let (mut controller, sink, renders) =
            scripted_controller(vec![Sample::at_now(37.5, 127.0)]);

        controller.user_requests_start().unwrap();
        controller.pump_samples(Duration::from_millis(100)).unwrap();
        controller.user_requests_stop().unwrap();

        // a fix that was already in flight when the stop landed
        let tx = sink.lock().unwrap().clone().unwrap();
        tx.send(Sample::at_now(37.6, 127.1)).unwrap();
        let recorded = controller.pump_samples(Duration::from_millis(100)).unwrap();

        assert_eq!(recorded, 0);
        assert_eq!(renders.load(Ordering::Relaxed), 1);
        assert_eq!(controller.snapshot().unwrap().coordinates().len(), 2);
    }

    #[test]
    fn reset_is_rejected_while_recording() {
        let (mut controller, _sink, _renders) =
            scripted_controller(vec![Sample::at_now(37.5, 127.0)]);

        controller.user_requests_start().unwrap();
        controller.pump_samples(Duration::from_millis(100)).unwrap();
        assert!(matches!(
            controller.user_requests_reset(),
            Err(Error::PreconditionNotMet(_))
        ));
        assert_eq!(controller.snapshot().unwrap().coordinates().len(), 2);
    }

    #[test]
    fn reset_after_stop_clears_the_trail_and_rerenders() {
        let (mut controller, _sink, renders) =
            scripted_controller(vec![Sample::at_now(37.5, 127.0)]);

        controller.user_requests_start().unwrap();
        controller.pump_samples(Duration::from_millis(100)).unwrap();
        controller.user_requests_stop().unwrap();
        controller.user_requests_reset().unwrap();

        assert!(controller.snapshot().unwrap().is_empty());
        // one render per sample plus the empty re-render after the reset
        assert_eq!(renders.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn failed_source_start_rolls_the_tracker_back_to_idle() {
        let mut controller =
            LifecycleController::new(Box::new(UnavailableSource), Vec::new());
        assert!(matches!(
            controller.user_requests_start(),
            Err(Error::SourceUnavailable(_))
        ));
        assert_eq!(
            controller.recording_state().unwrap(),
            RecordingState::Idle
        );
        // a fresh start must still be possible afterwards
        assert!(matches!(
            controller.user_requests_start(),
            Err(Error::SourceUnavailable(_))
        ));
    }

    #[test]
    fn double_start_is_rejected() {
        let (mut controller, _sink, _renders) = scripted_controller(Vec::new());
        controller.user_requests_start().unwrap();
        assert!(matches!(
            controller.user_requests_start(),
            Err(Error::PreconditionNotMet(_))
        ));
    }
}
