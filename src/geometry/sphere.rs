//! Unit-sphere geometry helpers.
//!
//! Everything in this module operates on plain `[f64; 3]` coordinate arrays
//! so the stored data stays serialization-friendly; `nalgebra` vectors are
//! used internally for the actual arithmetic.

use nalgebra::Vector3;
use std::f64::consts::PI;

#[inline]
fn vec3(p: [f64; 3]) -> Vector3<f64> {
    Vector3::new(p[0], p[1], p[2])
}

/// Converts spherical coordinates (radians) to a unit-sphere position.
///
/// Longitude is measured eastward from the +x axis, latitude northward from
/// the equatorial plane.
///
/// # Examples
///
/// ```rust
/// use hexglobe::geometry::sphere::from_lon_lat;
///
/// let north = from_lon_lat(0.0, std::f64::consts::FRAC_PI_2);
/// assert!((north[2] - 1.0).abs() < 1e-15);
/// ```
#[must_use]
pub fn from_lon_lat(longitude: f64, latitude: f64) -> [f64; 3] {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();
    [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
}

/// Longitude of a unit-sphere position, in `(-π, π]`.
#[must_use]
pub fn longitude(position: [f64; 3]) -> f64 {
    position[1].atan2(position[0])
}

/// Latitude of a unit-sphere position, in `[-π/2, π/2]`.
#[must_use]
pub fn latitude(position: [f64; 3]) -> f64 {
    position[2].clamp(-1.0, 1.0).asin()
}

/// Whether the great-circle segment between two longitudes crosses the
/// antimeridian seam of an unrolled (equirectangular-style) projection.
#[must_use]
pub fn crosses_antimeridian(lon_a: f64, lon_b: f64) -> bool {
    (lon_a - lon_b).abs() > PI
}

/// Normalized barycentric interpolation over a spherical triangle.
///
/// `x` runs from corner `a` toward `b`, `y` from `b` toward `c`, with
/// `0 ≤ y ≤ x ≤ 1`; the blended point is pushed back onto the unit sphere.
///
/// # Examples
///
/// ```rust
/// use hexglobe::geometry::sphere::face_point;
///
/// let a = [1.0, 0.0, 0.0];
/// let b = [0.0, 1.0, 0.0];
/// let c = [0.0, 0.0, 1.0];
/// assert_eq!(face_point(a, b, c, 0.0, 0.0), a);
/// assert_eq!(face_point(a, b, c, 1.0, 0.0), b);
/// assert_eq!(face_point(a, b, c, 1.0, 1.0), c);
/// ```
#[must_use]
pub fn face_point(a: [f64; 3], b: [f64; 3], c: [f64; 3], x: f64, y: f64) -> [f64; 3] {
    let blended = vec3(a) * (1.0 - x) + vec3(b) * (x - y) + vec3(c) * y;
    let unit = blended.normalize();
    [unit.x, unit.y, unit.z]
}

/// Counterclockwise angle of `target` around `origin` in the tangent plane at
/// `origin`, viewed from outside the sphere. Returns a value in `(-π, π]`.
///
/// The zero direction is arbitrary but fixed per origin, which is all the
/// neighbor-fan sorting needs.
#[must_use]
pub fn tangent_angle(origin: [f64; 3], target: [f64; 3]) -> f64 {
    let o = vec3(origin);
    let t = vec3(target);

    // Reference axis must not be parallel to the origin.
    let reference = if origin[2].abs() < 0.9 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    let east = reference.cross(&o).normalize();
    let north = o.cross(&east);

    let planar = t - o * t.dot(&o);
    planar.dot(&north).atan2(planar.dot(&east))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, TAU};

    #[test]
    fn lon_lat_roundtrip() {
        let p = from_lon_lat(1.1, -0.4);
        assert_relative_eq!(longitude(p), 1.1, epsilon = 1e-12);
        assert_relative_eq!(latitude(p), -0.4, epsilon = 1e-12);
        assert_relative_eq!(vec3(p).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn antimeridian_detection() {
        assert!(crosses_antimeridian(3.0, -3.0));
        assert!(!crosses_antimeridian(0.5, -0.5));
    }

    #[test]
    fn face_point_is_unit_length() {
        let a = from_lon_lat(0.0, FRAC_PI_2);
        let b = from_lon_lat(0.0, 0.4636);
        let c = from_lon_lat(TAU / 5.0, 0.4636);
        let p = face_point(a, b, c, 0.625, 0.25);
        assert_relative_eq!(vec3(p).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn tangent_angles_wind_counterclockwise_at_north_pole() {
        let origin = [0.0, 0.0, 1.0];
        // Five targets at increasing longitude around the pole.
        let angles: Vec<f64> = (0..5)
            .map(|k| tangent_angle(origin, from_lon_lat(TAU / 5.0 * f64::from(k), 0.4636)))
            .collect();

        // Consecutive differences are +72° modulo a full turn.
        for pair in angles.windows(2) {
            let step = (pair[1] - pair[0]).rem_euclid(TAU);
            assert_relative_eq!(step, TAU / 5.0, epsilon = 1e-9);
        }
    }
}
