use geo::AffineTransform;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VrtioError};

/// Six parameter affine geo-transform in the engine's order
/// `[x0, dx, 0, y0, 0, dy]`.
///
/// `dy` is negative for north-up rasters: the y origin sits on the top row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    pub fn new(parameters: [f64; 6]) -> Self {
        Self(parameters)
    }

    /// Transform for a north-up raster whose `(x0, y0)` is the pixel-center
    /// coordinate of the bottom row origin.
    ///
    /// Shifts half a cell from pixel center to pixel corner and projects the
    /// y origin to the top row, negating the row pitch. Cell sizes must be
    /// positive for the north-up convention to hold.
    pub fn from_origin(
        x0: f64,
        y0: f64,
        _x_size: usize,
        y_size: usize,
        delta_x: f64,
        delta_y: f64,
    ) -> Self {
        Self([
            x0 - delta_x * 0.5,
            delta_x,
            0.0,
            y0 + (y_size as f64 - 1.0) * delta_y + delta_y * 0.5,
            0.0,
            -delta_y,
        ])
    }

    pub fn as_array(&self) -> [f64; 6] {
        self.0
    }

    /// Map a pixel/row index to georeferenced coordinates.
    pub fn apply(&self, column: f64, row: f64) -> (f64, f64) {
        let [x0, dx, rx, y0, ry, dy] = self.0;
        (x0 + column * dx + row * rx, y0 + column * ry + row * dy)
    }

    pub fn to_affine(&self) -> AffineTransform {
        AffineTransform::new(self.0[1], self.0[2], self.0[0], self.0[4], self.0[5], self.0[3])
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(parameters: [f64; 6]) -> Self {
        Self(parameters)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

/// Known polar stereographic parameter combinations. Additions go here.
const EPSG_TABLE: &[(f64, f64, Hemisphere, &str)] = &[
    (45.0, 70.0, Hemisphere::North, "3413"),
    (0.0, 71.0, Hemisphere::South, "3031"),
];

/// Map polar stereographic parameters to an EPSG code.
///
/// Matches are exact; an unknown combination is an error, never a default
/// code.
pub fn resolve_epsg(
    rotation: f64,
    standard_latitude: f64,
    hemisphere: Hemisphere,
) -> Result<&'static str> {
    EPSG_TABLE
        .iter()
        .find(|(rot, slat, hemi, _)| {
            *rot == rotation && *slat == standard_latitude && *hemi == hemisphere
        })
        .map(|(_, _, _, code)| *code)
        .ok_or(VrtioError::UnsupportedProjection {
            rotation,
            standard_latitude,
            hemisphere,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_transform_is_exact() {
        let transform = GeoTransform::from_origin(0.0, 0.0, 100, 100, 1.0, 1.0);
        assert_eq!(transform.as_array(), [-0.5, 1.0, 0.0, 99.5, 0.0, -1.0]);
    }

    #[test]
    fn apply_walks_rows_downward() {
        let transform = GeoTransform::from_origin(0.0, 0.0, 4, 4, 2.0, 2.0);
        let (x, y) = transform.apply(0.5, 0.5);
        assert_eq!((x, y), (0.0, 6.0));
    }

    #[test]
    fn affine_conversion_keeps_parameter_order() {
        let transform = GeoTransform::from_origin(10.0, 20.0, 8, 8, 2.0, 2.0);
        let affine = transform.to_affine();
        assert_eq!(affine.xoff(), transform.as_array()[0]);
        assert_eq!(affine.e(), transform.as_array()[5]);
    }

    #[test]
    fn known_projections_resolve() {
        assert_eq!(resolve_epsg(45.0, 70.0, Hemisphere::North).unwrap(), "3413");
        assert_eq!(resolve_epsg(0.0, 71.0, Hemisphere::South).unwrap(), "3031");
    }

    #[test]
    fn unknown_projection_is_an_error() {
        let result = resolve_epsg(45.0, 70.0, Hemisphere::South);
        assert!(matches!(
            result,
            Err(VrtioError::UnsupportedProjection { .. })
        ));
    }
}
