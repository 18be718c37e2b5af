//! Render the recorded trail as plain text on the terminal
use super::RoutePresenter;
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::tracker::{MarkerKind, RouteSnapshot};
use crate::Error;
use log::{debug, warn};

/// Prints a textual summary of the trail, the full vertex list is emitted at
/// debug level so frequent re-renders stay readable
#[derive(Debug, Default)]
pub struct ConsolePresenter {}

impl FromServiceConfig for ConsolePresenter {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        for key in config.parameters() {
            warn!(
                "unknown configuration parameter for ConsolePresenter: {}={:?}",
                key,
                config.get_parameter(key)
            );
        }
        Ok(Self::default())
    }
}

impl RoutePresenter for ConsolePresenter {
    fn render(&self, snapshot: &RouteSnapshot) -> Result<(), Box<dyn std::error::Error>> {
        if snapshot.is_empty() {
            println!("trail: empty");
            return Ok(());
        }
        let last_label = snapshot
            .markers()
            .last()
            .map(|m| match m.kind() {
                MarkerKind::Start => format!("start marker \"{}\"", m.label()),
                MarkerKind::Waypoint => format!("waypoint at {}", m.label()),
            })
            .unwrap_or_else(|| "no markers".to_string());
        println!(
            "trail: {} points, {} markers ({})",
            snapshot.coordinates().len(),
            snapshot.markers().len(),
            last_label
        );
        for marker in snapshot.markers() {
            debug!(
                "marker [{:?}] {} @ {:.6}, {:.6}",
                marker.kind(),
                marker.label(),
                marker.location().latitude(),
                marker.location().longitude()
            );
        }
        for location in snapshot.coordinates() {
            debug!("vertex {:.6}, {:.6}", location.latitude(), location.longitude());
        }
        Ok(())
    }
}
