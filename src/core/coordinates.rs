//! Geodetic coordinates and the globe projection.
//!
//! The rendered globe is a sphere of radius [`GLOBE_RADIUS`] centered at the
//! origin, with Bevy's y axis through the poles. Aircraft positions are
//! projected onto it with a radial offset proportional to geometric altitude.

use bevy::math::Vec3;
use std::f32::consts::PI;

/// Base radius of the rendered globe in world units.
pub const GLOBE_RADIUS: f32 = 200.0;

/// Meters of geometric altitude per world unit of radial offset.
pub const ALTITUDE_SCALE_M: f32 = 2000.0;

#[derive(Debug)]
pub struct CoordError {
    pub msg: String,
}

/// A validated latitude/longitude pair, stored in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    /// Accepts latitude in [-90, 90] and longitude in [-180, 180].
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordError {
                msg: format!("Invalid latitude: {latitude:?}"),
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordError {
                msg: format!("Invalid longitude: {longitude:?}"),
            });
        }
        Ok(GeoPosition {
            latitude,
            longitude,
        })
    }

    /// Projects onto the globe at the given geometric altitude in meters.
    ///
    /// Longitude is offset by 180 degrees so the texture's prime meridian
    /// lines up with the sphere, and x is negated for Bevy's handedness.
    pub fn to_render_position(&self, altitude_m: f64) -> Vec3 {
        let radius = GLOBE_RADIUS + altitude_m as f32 / ALTITUDE_SCALE_M;
        let phi = (90.0 - self.latitude) as f32 * (PI / 180.0);
        let theta = (self.longitude + 180.0) as f32 * (PI / 180.0);
        Vec3::new(
            -radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        )
    }
}
