//! Ground Track
//!
//! A crate for tracking orbiting objects in real time and rendering their
//! ground-track position onto a fixed-resolution map display.
//!
//! The pipeline runs in three stages per tracked object per cycle:
//! SGP4 propagation produces an Earth-centered inertial position, the
//! geodetic converter rotates it into the Earth-fixed frame and solves for
//! latitude/longitude/altitude on the WGS-84 ellipsoid, and the map
//! projector maps that onto display pixels. A periodic tracking task drives
//! the pipeline and publishes results to a presentation sink shared with the
//! UI.

use thiserror::Error;

pub mod geodesy;
pub mod projection;
pub mod propagation;
pub mod registry;
pub mod tracking;

pub use geodesy::{eci_to_geodetic, gmst_from_unix};
pub use projection::{MapCalibration, MapProjector};
pub use propagation::{Satellite, Sgp4Satellite};
pub use registry::{BatchOutcome, SatRegistry, MAX_TRACKED};
pub use tracking::{FixedClock, PresentationSink, SystemClock, TimeSource, TrackingTask};

/// Result type alias for ground track operations.
pub type GroundTrackResult<T> = Result<T, GroundTrackError>;

/// Error types for ground track operations.
#[derive(Error, Debug, Clone)]
pub enum GroundTrackError {
    /// Caller input was null-like or out of range. Never retried.
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),
    /// The TLE lines failed parsing or the element validity check.
    #[error("InvalidTle: {0}")]
    InvalidTle(String),
    /// The orbital model could not produce a result for this instant.
    /// Per-object and possibly transient; never fatal to a whole cycle.
    #[error("PropagationFailure: {0}")]
    PropagationFailure(String),
    /// Registry capacity exhausted.
    #[error("NoFreeSlots: registry is at capacity")]
    NoFreeSlots,
    /// Caller-provided output buffer too small.
    #[error("InvalidSize: output buffer holds {got} entries, {needed} required")]
    InvalidSize { needed: usize, got: usize },
}

/// Cartesian position in an Earth-centered inertial (TEME) frame, in
/// kilometers. Produced fresh each propagation call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EciPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EciPosition {
    pub const ZERO: EciPosition = EciPosition {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        EciPosition { x, y, z }
    }

    /// True when every component is a normal, representable number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for EciPosition {
    fn from([x, y, z]: [f64; 3]) -> Self {
        EciPosition::new(x, y, z)
    }
}

/// Position referenced to the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    /// Latitude in degrees (-90 to 90)
    pub lat_deg: f64,
    /// Longitude in degrees (-180 to 180)
    pub lon_deg: f64,
    /// Altitude above the ellipsoid in kilometers
    pub alt_km: f64,
}

/// Integer pixel position, clamped into the target raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPosition {
    pub x: i32,
    pub y: i32,
}
