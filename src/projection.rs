//! Map projector.
//!
//! Maps geodetic latitude/longitude onto a pixel of the map raster with an
//! affine transform. The coefficients are device calibration values obtained
//! by triangulating the touch panel against the printed map image; this is a
//! local calibration, not a general cartographic projection, and it only
//! holds for the panel it was measured on.

use crate::PixelPosition;

/// Affine coefficients for `x = a_lon * lon + b_lon`,
/// `y = a_lat * lat + b_lat`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCalibration {
    pub a_lon: f64,
    pub b_lon: f64,
    pub a_lat: f64,
    pub b_lat: f64,
}

impl Default for MapCalibration {
    /// Calibration measured on the reference 320x480 panel.
    fn default() -> Self {
        MapCalibration {
            a_lon: -1.1209751651795787,
            b_lon: 159.49405898561318,
            a_lat: -2.4771128058151315,
            b_lat: 245.04521964791542,
        }
    }
}

/// Projects geodetic coordinates onto a raster of fixed dimensions.
#[derive(Debug, Clone, Copy)]
pub struct MapProjector {
    width: i32,
    height: i32,
    calibration: MapCalibration,
}

impl MapProjector {
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_calibration(width, height, MapCalibration::default())
    }

    pub fn with_calibration(width: i32, height: i32, calibration: MapCalibration) -> Self {
        MapProjector {
            width,
            height,
            calibration,
        }
    }

    /// Maps latitude/longitude in degrees to a pixel, rounded to nearest and
    /// clamped into `[0, width-1] x [0, height-1]`.
    ///
    /// Returns `None` when either raster dimension is degenerate (<= 1).
    pub fn project(&self, lat_deg: f64, lon_deg: f64) -> Option<PixelPosition> {
        if self.width <= 1 || self.height <= 1 {
            return None;
        }

        let x_raw = self.calibration.a_lon * lon_deg + self.calibration.b_lon;
        let y_raw = self.calibration.a_lat * lat_deg + self.calibration.b_lat;

        let x = (x_raw.round() as i32).clamp(0, self.width - 1);
        let y = (y_raw.round() as i32).clamp(0, self.height - 1);

        Some(PixelPosition { x, y })
    }
}
