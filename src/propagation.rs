//! Propagation service adapter.
//!
//! Wraps the external SGP4 integrator behind a narrow capability so any
//! conforming orbital-mechanics library can be substituted. The adapter owns
//! TLE validation and the UTC-instant to propagator-native time conversion;
//! it never caches positions.

use crate::{EciPosition, GroundTrackError, GroundTrackResult};
use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

/// LUR-1 (NORAD 60506) reference element set from CelesTrak, compiled in so
/// the device can track without a network or storage collaborator.
pub const LUR1_TLE_LINE1: &str =
    "1 60506U 24149AQ  25342.16685245  .00010984  00000+0  41796-3 0  9991";
pub const LUR1_TLE_LINE2: &str =
    "2 60506  97.3940  57.6190 0002917 258.9691 101.1220 15.26924079 72795";

/// Narrow propagation capability consumed by the registry and tracking task.
///
/// Implementors are exclusively owned handles: creation validates the element
/// set once, and propagation is a pure function of (handle state, instant)
/// aside from the model's internal epoch reference.
pub trait Satellite {
    /// Element epoch as a UTC instant.
    fn epoch(&self) -> DateTime<Utc>;

    /// Propagates to the given UTC instant (integer seconds since the Unix
    /// epoch) and returns the ECI position in kilometers.
    fn position_at(&self, unix_time_sec: i64) -> GroundTrackResult<EciPosition>;
}

/// Satellite handle backed by the `sgp4` crate.
///
/// Owns the parsed element set; the propagation constants are rebuilt from
/// it on each call, so a call is a pure function of (elements, instant).
pub struct Sgp4Satellite {
    epoch: DateTime<Utc>,
    elements: Elements,
}

impl Sgp4Satellite {
    /// Creates a handle from a TLE line pair.
    ///
    /// Fails with `InvalidArgument` for empty lines and `InvalidTle` when the
    /// parser or the element validity check (non-physical eccentricity,
    /// inclination, ...) rejects them. Logs the element epoch on success for
    /// diagnostics.
    pub fn from_tle(line1: &str, line2: &str) -> GroundTrackResult<Self> {
        if line1.trim().is_empty() || line2.trim().is_empty() {
            return Err(GroundTrackError::InvalidArgument(
                "TLE lines must be non-empty".to_string(),
            ));
        }

        let elements = Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|e| GroundTrackError::InvalidTle(format!("Failed to parse TLE: {e}")))?;

        // Run the model's own element validity check (non-physical
        // eccentricity, inclination, ...) once at creation time.
        Constants::from_elements(&elements)
            .map_err(|e| GroundTrackError::InvalidTle(format!("Element check failed: {e}")))?;

        let epoch = elements.datetime.and_utc();
        log::info!("Satellite created from TLE, epoch {epoch}");

        Ok(Sgp4Satellite { epoch, elements })
    }
}

impl Satellite for Sgp4Satellite {
    fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    fn position_at(&self, unix_time_sec: i64) -> GroundTrackResult<EciPosition> {
        let timestamp = DateTime::<Utc>::from_timestamp(unix_time_sec, 0).ok_or_else(|| {
            GroundTrackError::InvalidArgument(format!(
                "Instant {unix_time_sec} is not representable as UTC"
            ))
        })?;

        // The integrator's native time axis is minutes since element epoch.
        let duration = timestamp.signed_duration_since(self.epoch);
        let minutes_since_epoch = duration.num_seconds() as f64 / 60.0;

        let constants = Constants::from_elements(&self.elements).map_err(|e| {
            GroundTrackError::PropagationFailure(format!("Failed to create constants: {e}"))
        })?;

        let prediction = constants.propagate(minutes_since_epoch).map_err(|e| {
            GroundTrackError::PropagationFailure(format!(
                "Propagation failed at {minutes_since_epoch:.3} min from epoch: {e}"
            ))
        })?;

        Ok(EciPosition::from(prediction.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_from_reference_tle() {
        let sat = Sgp4Satellite::from_tle(LUR1_TLE_LINE1, LUR1_TLE_LINE2);
        assert!(sat.is_ok(), "reference TLE should parse: {:?}", sat.err());

        let sat = sat.unwrap();
        // Epoch day 342 of 2025 falls in December.
        assert_eq!(sat.epoch().format("%Y-%m").to_string(), "2025-12");
    }

    #[test]
    fn test_create_rejects_empty_lines() {
        assert!(matches!(
            Sgp4Satellite::from_tle("", LUR1_TLE_LINE2),
            Err(GroundTrackError::InvalidArgument(_))
        ));
        assert!(matches!(
            Sgp4Satellite::from_tle(LUR1_TLE_LINE1, "   "),
            Err(GroundTrackError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_create_rejects_garbage() {
        let result = Sgp4Satellite::from_tle("not a tle", "also not a tle");
        assert!(matches!(result, Err(GroundTrackError::InvalidTle(_))));
    }

    #[test]
    fn test_repeated_create_and_drop() {
        // Handles are created and dropped in a tight loop; each drop releases
        // the underlying model exactly once.
        for _ in 0..100 {
            let sat = Sgp4Satellite::from_tle(LUR1_TLE_LINE1, LUR1_TLE_LINE2)
                .expect("reference TLE should parse");
            drop(sat);
        }
    }

    #[test]
    fn test_propagation_is_finite_across_epoch_range() {
        let sat = Sgp4Satellite::from_tle(LUR1_TLE_LINE1, LUR1_TLE_LINE2).unwrap();
        let epoch_unix = sat.epoch().timestamp();

        // Sample out to five years either side of epoch. Within 90 days of
        // epoch (well beyond the window a TLE is normally refreshed in) the
        // model must produce a position. Far outside that window the
        // reference object's drag term is large enough that the model may
        // legitimately report decay as a `PropagationFailure`; what is never
        // acceptable is a silently non-finite vector. The step is offset
        // from a whole orbit count so the samples sweep the orbit.
        let five_years_sec: i64 = 5 * 365 * 86_400;
        let ninety_days_sec: i64 = 90 * 86_400;
        let mut t = epoch_unix - five_years_sec;
        while t <= epoch_unix + five_years_sec {
            match sat.position_at(t) {
                Ok(eci) => {
                    assert!(eci.is_finite(), "non-finite position at unix {t}: {eci:?}");
                }
                Err(GroundTrackError::PropagationFailure(e)) => {
                    assert!(
                        (t - epoch_unix).abs() > ninety_days_sec,
                        "propagation failed near epoch at unix {t}: {e}"
                    );
                }
                Err(e) => panic!("unexpected error at unix {t}: {e}"),
            }
            t += 6 * 3600 + 900;
        }
    }

    #[test]
    fn test_propagation_altitude_is_orbital() {
        let sat = Sgp4Satellite::from_tle(LUR1_TLE_LINE1, LUR1_TLE_LINE2).unwrap();
        let eci = sat.position_at(sat.epoch().timestamp()).unwrap();

        let radius_km = (eci.x * eci.x + eci.y * eci.y + eci.z * eci.z).sqrt();
        // LUR-1 is a ~500 km LEO object; the radius must sit between the
        // Earth's surface and a generous LEO ceiling.
        assert!(
            radius_km > 6378.0 && radius_km < 8378.0,
            "implausible orbital radius: {radius_km} km"
        );
    }
}
