mod bearing;
mod coordinate;
mod distance;
mod error;
mod polyline;

pub use bearing::bearing_deg;
pub use coordinate::{DriverLocationSample, GeoCoordinate};
pub use distance::{haversine_miles, meters_to_miles};
pub use error::GeoError;
pub use polyline::{decode_polyline, encode_polyline};
