pub mod error;
pub mod polyline;
pub mod tracking;
