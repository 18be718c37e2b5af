//! Route tracking state machine
//!
//! The tracker owns the authoritative in-memory trail and markers for the
//! current (or most recently completed) recording session. All mutation of the
//! trail is gated by the recording state so a trail can never be cleared while
//! it is still growing.
use crate::gps::{Location, Sample};
use crate::Error;
use log::debug;
use std::fmt;

/// Current state of the route tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingState::Idle => write!(f, "idle"),
            RecordingState::Recording => write!(f, "recording"),
        }
    }
}

/// Role of a marker placed along the trail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    Waypoint,
}

/// A labeled point of interest along the recorded trail
#[derive(Clone, Debug)]
pub struct Marker {
    kind: MarkerKind,
    location: Location,
    label: String,
}

impl Marker {
    /// Create the marker for the first recorded position of a session
    fn start(location: Location) -> Self {
        Marker {
            kind: MarkerKind::Start,
            location,
            label: "start".to_string(),
        }
    }

    /// Create a movement marker captioned with the capture time of the fix
    fn waypoint(sample: &Sample) -> Self {
        Marker {
            kind: MarkerKind::Waypoint,
            location: sample.location(),
            label: sample.timestamp().format("%H:%M:%S").to_string(),
        }
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Owned copy of the trail handed to presentation services
#[derive(Clone, Debug, Default)]
pub struct RouteSnapshot {
    coordinates: Vec<Location>,
    markers: Vec<Marker>,
}

impl RouteSnapshot {
    pub fn coordinates(&self) -> &[Location] {
        &self.coordinates
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty() && self.markers.is_empty()
    }
}

/// Maintains the recorded trail and enforces the recording state machine
#[derive(Debug, Default)]
pub struct RouteTracker {
    route: Vec<Location>,
    markers: Vec<Marker>,
    recording: bool,
}

impl RouteTracker {
    /// Create a tracker with an empty trail in the idle state
    pub fn new() -> Self {
        RouteTracker::default()
    }

    /// Begin a recording session.
    ///
    /// A trail left over from a previous session is kept; it only goes away
    /// with an explicit [`reset`](RouteTracker::reset).
    pub fn start(&mut self) -> Result<(), Error> {
        if self.recording {
            return Err(Error::PreconditionNotMet(
                "a recording session is already active".to_string(),
            ));
        }
        self.recording = true;
        Ok(())
    }

    /// End the current recording session, returns false if none was active
    pub fn stop(&mut self) -> bool {
        if !self.recording {
            return false;
        }
        self.recording = false;
        true
    }

    /// Clear the trail and markers, only permitted while idle
    pub fn reset(&mut self) -> Result<(), Error> {
        if self.recording {
            return Err(Error::PreconditionNotMet(
                "cannot reset the trail while a recording session is active".to_string(),
            ));
        }
        self.route.clear();
        self.markers.clear();
        Ok(())
    }

    /// Record a location fix, returns true if it was added to the trail.
    ///
    /// A sample delivered while idle is discarded; location callbacks can race
    /// a stop request so a late fix must not grow (or crash) the trail.
    pub fn record_sample(&mut self, sample: Sample) -> bool {
        if !self.recording {
            debug!(
                "discarding stale location sample received while idle: {:?}",
                sample
            );
            return false;
        }
        let location = sample.location();
        if self.route.is_empty() {
            // duplicate the first point so the polyline has a zero-length
            // segment to render before the second fix arrives
            self.route.push(location);
            self.route.push(location);
            self.markers.push(Marker::start(location));
        } else {
            self.route.push(location);
            self.markers.push(Marker::waypoint(&sample));
        }
        true
    }

    /// Current state of the recording state machine
    pub fn state(&self) -> RecordingState {
        if self.recording {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    /// True if neither trail coordinates nor markers have been recorded
    pub fn is_empty(&self) -> bool {
        self.route.is_empty() && self.markers.is_empty()
    }

    /// Owned copy of the trail and markers for presentation services
    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            coordinates: self.route.clone(),
            markers: self.markers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(latitude: f64, longitude: f64) -> Sample {
        Sample::new(
            Location::new(latitude, longitude),
            Utc.ymd(2023, 4, 2).and_hms(9, 41, 27),
        )
    }

    #[test]
    fn first_sample_seeds_a_zero_length_segment() {
        let mut tracker = RouteTracker::new();
        tracker.start().unwrap();
        assert!(tracker.record_sample(sample(37.5, 127.0)));

        let snapshot = tracker.snapshot();
        assert_eq!(
            snapshot.coordinates(),
            &[Location::new(37.5, 127.0), Location::new(37.5, 127.0)]
        );
        assert_eq!(snapshot.markers().len(), 1);
        assert_eq!(snapshot.markers()[0].kind(), MarkerKind::Start);
        assert_eq!(snapshot.markers()[0].location(), Location::new(37.5, 127.0));
    }

    #[test]
    fn later_samples_append_one_point_and_a_waypoint_marker() {
        let mut tracker = RouteTracker::new();
        tracker.start().unwrap();
        tracker.record_sample(sample(37.5, 127.0));
        tracker.record_sample(sample(37.6, 127.1));

        let snapshot = tracker.snapshot();
        assert_eq!(
            snapshot.coordinates(),
            &[
                Location::new(37.5, 127.0),
                Location::new(37.5, 127.0),
                Location::new(37.6, 127.1),
            ]
        );
        assert_eq!(snapshot.markers().len(), 2);
        assert_eq!(snapshot.markers()[1].kind(), MarkerKind::Waypoint);
        assert_eq!(snapshot.markers()[1].location(), Location::new(37.6, 127.1));
        assert_eq!(snapshot.markers()[1].label(), "09:41:27");
    }

    #[test]
    fn trail_length_tracks_sample_count() {
        let mut tracker = RouteTracker::new();
        tracker.start().unwrap();
        let count = 25;
        for i in 0..count {
            tracker.record_sample(sample(37.5 + (i as f64) * 0.001, 127.0));
        }

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.coordinates().len(), count + 1);
        assert_eq!(snapshot.markers().len(), count);
        let starts = snapshot
            .markers()
            .iter()
            .filter(|m| m.kind() == MarkerKind::Start)
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn start_while_recording_is_rejected() {
        let mut tracker = RouteTracker::new();
        tracker.start().unwrap();
        assert!(matches!(
            tracker.start(),
            Err(Error::PreconditionNotMet(_))
        ));
        assert_eq!(tracker.state(), RecordingState::Recording);
    }

    #[test]
    fn stop_while_idle_is_a_noop() {
        let mut tracker = RouteTracker::new();
        assert!(!tracker.stop());
        assert_eq!(tracker.state(), RecordingState::Idle);
    }

    #[test]
    fn reset_while_recording_is_rejected_and_leaves_the_trail_alone() {
        let mut tracker = RouteTracker::new();
        tracker.start().unwrap();
        tracker.record_sample(sample(37.5, 127.0));

        assert!(matches!(
            tracker.reset(),
            Err(Error::PreconditionNotMet(_))
        ));
        assert_eq!(tracker.state(), RecordingState::Recording);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.coordinates().len(), 2);
        assert_eq!(snapshot.markers().len(), 1);
    }

    #[test]
    fn samples_while_idle_are_discarded() {
        let mut tracker = RouteTracker::new();
        assert!(!tracker.record_sample(sample(37.5, 127.0)));
        assert!(tracker.is_empty());

        // same guard applies to a fix racing in right after a stop
        tracker.start().unwrap();
        tracker.record_sample(sample(37.5, 127.0));
        tracker.stop();
        assert!(!tracker.record_sample(sample(37.6, 127.1)));
        assert_eq!(tracker.snapshot().coordinates().len(), 2);
    }

    #[test]
    fn reset_after_stop_clears_everything() {
        let mut tracker = RouteTracker::new();
        tracker.start().unwrap();
        tracker.record_sample(sample(37.5, 127.0));
        tracker.record_sample(sample(37.6, 127.1));
        assert!(tracker.stop());
        tracker.reset().unwrap();

        assert!(tracker.is_empty());
        assert!(tracker.snapshot().is_empty());
        assert_eq!(tracker.state(), RecordingState::Idle);
    }

    #[test]
    fn trail_persists_across_stop_and_restart() {
        let mut tracker = RouteTracker::new();
        tracker.start().unwrap();
        tracker.record_sample(sample(37.5, 127.0));
        tracker.stop();

        // restarting continues the existing trail rather than clearing it
        tracker.start().unwrap();
        tracker.record_sample(sample(37.6, 127.1));
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.coordinates().len(), 3);
        assert_eq!(snapshot.markers().len(), 2);
        assert_eq!(snapshot.markers()[0].kind(), MarkerKind::Start);
    }
}
