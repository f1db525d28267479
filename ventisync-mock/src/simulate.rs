use std::f64::consts::PI;

use rand::Rng;
use ventisync_api::models::DeviceReading;

/// Local sensor reading for a given point of the day (0.0 = midnight).
///
/// Temperature follows a daily sine peaking mid-afternoon, AQI jitters around its base.
pub fn simulated_reading<R: Rng>(
    rng: &mut R,
    base_temperature: f64,
    base_aqi: u32,
    day_fraction: f64,
) -> DeviceReading {
    let radians = (day_fraction - 0.375) * 2.0 * PI;
    let temperature_c = base_temperature + radians.sin() * 5.0 + rng.random_range(-0.5..0.5);
    let european_aqi = (base_aqi as i64 + rng.random_range(-5..=5)).max(0) as u32;

    DeviceReading {
        temperature_c: (temperature_c * 10.0).round() / 10.0,
        european_aqi: Some(european_aqi),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_reading_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);

        for step in 0..96 {
            let reading = simulated_reading(&mut rng, 21.0, 3, step as f64 / 96.0);

            assert!((15.0..=27.0).contains(&reading.temperature_c));
            assert!(reading.european_aqi.unwrap() <= 8);
        }
    }

    #[test]
    fn test_afternoon_warmer_than_night() {
        let mut rng = StdRng::seed_from_u64(1);

        let afternoon = simulated_reading(&mut rng, 21.0, 30, 0.625);
        let night = simulated_reading(&mut rng, 21.0, 30, 0.125);

        assert!(afternoon.temperature_c > night.temperature_c);
    }
}
