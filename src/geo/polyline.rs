use super::{GeoCoordinate, GeoError};

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: u8 = 0x1f;
const CONTINUATION: u8 = 0x20;
const OFFSET: u8 = 63;

/// Decodes an encoded polyline (5 decimal places) into coordinates.
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoCoordinate>, GeoError> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();
    let mut cursor = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while cursor < bytes.len() {
        lat = lat
            .checked_add(next_value(bytes, &mut cursor)?)
            .ok_or(GeoError::Overflow(cursor))?;
        if cursor >= bytes.len() {
            return Err(GeoError::Truncated(cursor));
        }
        lng = lng
            .checked_add(next_value(bytes, &mut cursor)?)
            .ok_or(GeoError::Overflow(cursor))?;

        coordinates.push(GeoCoordinate::new(
            lat as f64 / PRECISION,
            lng as f64 / PRECISION,
        ));
    }

    Ok(coordinates)
}

fn next_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, GeoError> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let offset = *cursor;
        let byte = *bytes.get(offset).ok_or(GeoError::Truncated(offset))?;
        if !(OFFSET..=OFFSET + 0x3f).contains(&byte) {
            return Err(GeoError::InvalidByte { byte, offset });
        }
        if shift > 60 {
            return Err(GeoError::Overflow(offset));
        }

        let chunk = byte - OFFSET;
        result |= i64::from(chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        *cursor += 1;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    // zig-zag: the low bit carries the sign
    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encodes coordinates with the same 5 decimal place precision. Points
/// must be valid latitude/longitude pairs.
pub fn encode_polyline(coordinates: &[GeoCoordinate]) -> Result<String, GeoError> {
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for (index, coordinate) in coordinates.iter().enumerate() {
        if !coordinate.is_valid() {
            return Err(GeoError::OutOfRange {
                index,
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            });
        }
        let lat = (coordinate.latitude * PRECISION).round() as i64;
        let lng = (coordinate.longitude * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    Ok(out)
}

fn push_value(out: &mut String, value: i64) {
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;
    while zigzag >= u64::from(CONTINUATION) {
        let chunk = (zigzag as u8 & CHUNK_MASK) | CONTINUATION;
        out.push(char::from(chunk + OFFSET));
        zigzag >>= CHUNK_BITS;
    }
    out.push(char::from(zigzag as u8 + OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decodes_reference_example() {
        let decoded = decode_polyline(CANONICAL).unwrap();
        assert_eq!(
            decoded,
            vec![
                GeoCoordinate::new(38.5, -120.2),
                GeoCoordinate::new(40.7, -120.95),
                GeoCoordinate::new(43.252, -126.453),
            ]
        );
    }

    #[test]
    fn encodes_reference_example() {
        let points = [
            GeoCoordinate::new(38.5, -120.2),
            GeoCoordinate::new(40.7, -120.95),
            GeoCoordinate::new(43.252, -126.453),
        ];
        assert_eq!(encode_polyline(&points).unwrap(), CANONICAL);
    }

    #[test]
    fn empty_input_is_empty_path() {
        assert_eq!(decode_polyline("").unwrap(), Vec::new());
        assert_eq!(encode_polyline(&[]).unwrap(), "");
    }

    #[test]
    fn single_zero_point() {
        assert_eq!(decode_polyline("??").unwrap(), vec![GeoCoordinate::new(0.0, 0.0)]);
    }

    #[test]
    fn missing_longitude_is_truncated() {
        assert_eq!(decode_polyline("_p~iF"), Err(GeoError::Truncated(5)));
    }

    #[test]
    fn dangling_continuation_is_truncated() {
        // '_' has the continuation bit set and nothing follows
        assert_eq!(decode_polyline("_p~iF~ps|U_"), Err(GeoError::Truncated(11)));
    }

    #[test]
    fn rejects_bytes_outside_alphabet() {
        assert_eq!(
            decode_polyline("_p~iF ps|U"),
            Err(GeoError::InvalidByte {
                byte: b' ',
                offset: 5
            })
        );
    }

    #[test]
    fn long_continuation_overflows() {
        let encoded = "~".repeat(20);
        assert!(matches!(
            decode_polyline(&encoded),
            Err(GeoError::Overflow(_))
        ));
    }

    #[test]
    fn accumulated_deltas_overflow_without_panicking() {
        let encoded = "}~~~~~~~~~~~F?".repeat(3);
        assert!(matches!(
            decode_polyline(&encoded),
            Err(GeoError::Overflow(_))
        ));
    }

    #[test]
    fn encode_rejects_out_of_range_points() {
        let points = [
            GeoCoordinate::new(1e300, 0.0),
            GeoCoordinate::new(-1e300, 0.0),
        ];
        assert!(matches!(
            encode_polyline(&points),
            Err(GeoError::OutOfRange { index: 0, .. })
        ));

        let points = [GeoCoordinate::new(10.0, 20.0), GeoCoordinate::new(0.0, 181.0)];
        assert!(matches!(
            encode_polyline(&points),
            Err(GeoError::OutOfRange { index: 1, .. })
        ));

        let points = [GeoCoordinate::new(f64::NAN, 0.0)];
        assert!(encode_polyline(&points).is_err());
    }

    #[test]
    fn encode_accepts_extremes() {
        let points = [GeoCoordinate::new(90.0, 180.0), GeoCoordinate::new(-90.0, -180.0)];
        let encoded = encode_polyline(&points).unwrap();
        assert_eq!(decode_polyline(&encoded).unwrap(), points.to_vec());
    }
}
