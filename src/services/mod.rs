//! Service module that exports interfaces to external collaborators
//! (location providers, presentation backends)

pub mod location;
pub mod presentation;

// rexport some traits and utilty functions
pub use location::{new_location_handler, LocationSource};
pub use presentation::{new_presentation_handler, RoutePresenter};
