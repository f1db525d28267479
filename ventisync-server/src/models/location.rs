use std::fmt;

use ventisync_api::models::Coordinates;

/// Decimal places kept when keying the cache by coordinates (0.01° ≈ 1 km).
pub const COORDINATE_PRECISION: i32 = 2;

const SCALE: f64 = 100.0;

/// Cache key: a coordinate pair rounded to [`COORDINATE_PRECISION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationKey {
    lat: i32,
    lon: i32,
}

impl LocationKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat: (latitude * SCALE).round() as i32,
            lon: (longitude * SCALE).round() as i32,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.lat as f64 / SCALE
    }

    pub fn longitude(&self) -> f64 {
        self.lon as f64 / SCALE
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude(),
            longitude: self.longitude(),
        }
    }
}

impl From<Coordinates> for LocationKey {
    fn from(value: Coordinates) -> Self {
        LocationKey::new(value.latitude, value.longitude)
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = COORDINATE_PRECISION as usize;
        write!(f, "{:.precision$},{:.precision$}", self.latitude(), self.longitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_precision() {
        assert_eq!(LocationKey::new(45.1812, 5.7249), LocationKey::new(45.18, 5.72));
        assert_ne!(LocationKey::new(45.186, 5.72), LocationKey::new(45.18, 5.72));
        assert_eq!(LocationKey::new(-33.868, 151.209).to_string(), "-33.87,151.21");
    }

    #[test]
    fn test_coordinates() {
        let key = LocationKey::new(45.18, 5.72);

        assert!((key.latitude() - 45.18).abs() < 1e-9);
        assert!((key.longitude() - 5.72).abs() < 1e-9);
        assert_eq!(LocationKey::from(key.coordinates()), key);
    }
}
