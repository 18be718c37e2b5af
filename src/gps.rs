//! Module with GPS specific structures
use chrono::{DateTime, Utc};
use std::char;

/// Stores a single geospatial point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
}

impl Location {
    /// Create a location from coordinates provided in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
        }
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A single location fix delivered by a location source
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    location: Location,
    /// capture time of the fix
    timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(location: Location, timestamp: DateTime<Utc>) -> Self {
        Sample {
            location,
            timestamp,
        }
    }

    /// Create a sample stamped with the current time
    pub fn at_now(latitude: f64, longitude: f64) -> Self {
        Sample::new(Location::new(latitude, longitude), Utc::now())
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Encodes a slice of coordinates into Google Encoded Polyline format.
///
/// This code was extracted and simplified for our use case from:
/// https://github.com/georust/polyline
/// https://developers.google.com/maps/documentation/utilities/polylinealgorithm
pub fn encode_coordinates(coordinates: &[Location]) -> Result<String, String> {
    let mut output = "".to_string();
    let mut b = (0, 0);

    for a in coordinates {
        let a = (scale(a.latitude), scale(a.longitude));
        output = output + &encode(a.0, b.0)?;
        output = output + &encode(a.1, b.1)?;
        b = a;
    }

    Ok(output)
}

/// Scale a floating point value into an integer at the given precision
#[inline]
fn scale(n: f64) -> i64 {
    static FACTOR: f64 = 100_000.0; // use 5 digits of precision
    (FACTOR * n).round() as i64
}

/// Encode a single latitude or longitude value into the polyline format
fn encode(current: i64, previous: i64) -> Result<String, String> {
    let mut coordinate = (current - previous) << 1;
    if (current - previous) < 0 {
        coordinate = !coordinate;
    }
    let mut output: String = "".to_string();
    while coordinate >= 0x20 {
        let from_char = char::from_u32(((0x20 | (coordinate & 0x1f)) + 63) as u32)
            .ok_or("Couldn't convert character")?;
        output.push(from_char);
        coordinate >>= 5;
    }
    let from_char = char::from_u32((coordinate + 63) as u32).ok_or("Couldn't convert character")?;
    output.push(from_char);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_coordinates() {
        // reference values from the Google polyline algorithm docs
        let coords = [
            Location::new(38.5, -120.2),
            Location::new(40.7, -120.95),
            Location::new(43.252, -126.453),
        ];
        assert_eq!(
            encode_coordinates(&coords).unwrap(),
            "_p~iF~ps|U_ulLnnqC_mqNvxq`@"
        );
    }

    #[test]
    fn encode_empty_trace() {
        assert_eq!(encode_coordinates(&[]).unwrap(), "");
    }
}
