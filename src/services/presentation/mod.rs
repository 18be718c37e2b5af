//! Presentation services that render the recorded trail for the user
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::tracker::RouteSnapshot;
use crate::Error;

mod console;
pub use console::ConsolePresenter;
mod polyline;
pub use polyline::PolylinePresenter;

/// Trait that defines how a recorded trail snapshot gets rendered.
///
/// Presenters are strictly read only observers, they never feed anything back
/// into the tracker.
pub trait RoutePresenter {
    /// Render the trail and its markers
    fn render(&self, snapshot: &RouteSnapshot) -> Result<(), Box<dyn std::error::Error>>;
}

/// Create a boxed presenter from the "presentation" service configuration
pub fn new_presentation_handler(config: &ServiceConfig) -> Result<Box<dyn RoutePresenter>, Error> {
    match config.handler() {
        "console" => Ok(Box::new(ConsolePresenter::from_config(config)?)),
        "polyline" => Ok(Box::new(PolylinePresenter::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no presentation handler exists for: {}",
            config.handler()
        ))),
    }
}
