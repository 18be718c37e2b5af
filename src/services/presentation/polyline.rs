//! Render the recorded trail as a Google Encoded Polyline string that can be
//! pasted into external map viewers
use super::RoutePresenter;
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::encode_coordinates;
use crate::tracker::RouteSnapshot;
use crate::Error;
use log::warn;

/// Prints the encoded polyline for the trail plus one line per marker
#[derive(Debug, Default)]
pub struct PolylinePresenter {}

impl FromServiceConfig for PolylinePresenter {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        for key in config.parameters() {
            warn!(
                "unknown configuration parameter for PolylinePresenter: {}={:?}",
                key,
                config.get_parameter(key)
            );
        }
        Ok(Self::default())
    }
}

impl RoutePresenter for PolylinePresenter {
    fn render(&self, snapshot: &RouteSnapshot) -> Result<(), Box<dyn std::error::Error>> {
        let encoded = encode_coordinates(snapshot.coordinates())?;
        println!("polyline: {}", encoded);
        for marker in snapshot.markers() {
            println!(
                "marker [{:?}] {} @ {:.6}, {:.6}",
                marker.kind(),
                marker.label(),
                marker.location().latitude(),
                marker.location().longitude()
            );
        }
        Ok(())
    }
}
