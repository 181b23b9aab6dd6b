use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
    #[error("polyline truncated at offset {0}")]
    Truncated(usize),
    #[error("polyline value overflows at offset {0}")]
    Overflow(usize),
    #[error("coordinate {index} out of range: {latitude},{longitude}")]
    OutOfRange {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
}
