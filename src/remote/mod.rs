mod directions;
mod error;
mod location;

pub use directions::{
    DirectionsProvider, GoogleDirectionsClient, RoutedPath,
    DEFAULT_DIRECTIONS_URL,
};
pub use error::RemoteError;
pub use location::{DriverLocation, LocationReport, LocationSource, RideApiClient, RideRef};
