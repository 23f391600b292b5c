//! Earth-fixed geodetic converter.
//!
//! Rotates an inertial-frame position into the Earth-fixed frame using the
//! Greenwich Mean Sidereal Time angle, then solves for geodetic latitude and
//! altitude on the WGS-84 ellipsoid by fixed-point iteration.

use crate::{EciPosition, GeodeticPosition};

const WGS84_A_KM: f64 = 6378.137;
const WGS84_F: f64 = 1.0 / 298.257223563;
const WGS84_E2: f64 = 2.0 * WGS84_F - WGS84_F * WGS84_F;

/// The latitude/altitude solve always runs this many rounds. The count is a
/// fixed-cost engineering choice for the real-time cycle: per-call cost stays
/// bounded and predictable, and convergence is not verified.
const GEODETIC_ITERATIONS: usize = 5;

fn unix_to_julian_date(unix_time_sec: i64) -> f64 {
    (unix_time_sec as f64) / 86400.0 + 2440587.5
}

/// Greenwich Mean Sidereal Time in radians for a UTC instant.
///
/// Polynomial in Julian centuries since J2000, normalized to [0, 360)
/// degrees before conversion.
pub fn gmst_from_unix(unix_time_sec: i64) -> f64 {
    let jd = unix_to_julian_date(unix_time_sec);
    let t = (jd - 2451545.0) / 36525.0;

    let gmst_deg = 280.46061837 + 360.98564736629 * (jd - 2451545.0) + 0.000387933 * t * t
        - (t * t * t) / 38710000.0;

    gmst_deg.rem_euclid(360.0).to_radians()
}

/// Converts an ECI position to geodetic latitude/longitude/altitude for the
/// given UTC instant.
///
/// Boundary condition: the iteration runs unconditionally, so degenerate
/// inputs (r ≈ 0, a position on the polar axis) produce non-finite
/// latitude/altitude components rather than a fault; callers that can see
/// such inputs should check the outputs with `is_finite()`.
pub fn eci_to_geodetic(eci: &EciPosition, unix_time_sec: i64) -> GeodeticPosition {
    let theta = gmst_from_unix(unix_time_sec);
    let (s, c) = theta.sin_cos();

    // Rotate about the polar axis by -GMST into the Earth-fixed frame.
    let x = c * eci.x + s * eci.y;
    let y = -s * eci.x + c * eci.y;
    let z = eci.z;

    let r = (x * x + y * y).sqrt();

    let lon = y.atan2(x);
    let mut lat = z.atan2(r * (1.0 - WGS84_E2));
    let mut alt = 0.0;

    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        alt = r / lat.cos() - n;
        lat = z.atan2(r * (1.0 - WGS84_E2 * (n / (n + alt))));
    }

    GeodeticPosition {
        lat_deg: lat.to_degrees(),
        lon_deg: lon.to_degrees(),
        alt_km: alt,
    }
}
