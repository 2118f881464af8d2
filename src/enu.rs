//! ECEF to local East North Up conversion.
use map_3d::{ecef2geodetic, rad2deg, Ellipsoid};
use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [ReferencePoint] is the ECEF position (in meters) local
/// displacements are expressed against.
#[derive(Default, Copy, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferencePoint(f64, f64, f64);

impl From<(f64, f64, f64)> for ReferencePoint {
    fn from(xyz: (f64, f64, f64)) -> Self {
        Self(xyz.0, xyz.1, xyz.2)
    }
}

impl From<ReferencePoint> for (f64, f64, f64) {
    fn from(val: ReferencePoint) -> Self {
        (val.0, val.1, val.2)
    }
}

impl ReferencePoint {
    /// Builds Self from ECEF coordinates
    pub fn from_ecef(x: f64, y: f64, z: f64) -> Self {
        Self(x, y, z)
    }
    /// Returns ECEF coordinates
    pub fn to_ecef(&self) -> (f64, f64, f64) {
        (self.0, self.1, self.2)
    }
    /// Geocentric latitude and longitude, in radians.
    /// Undefined at the origin, longitude undefined at the poles.
    pub fn latitude_longitude(&self) -> (f64, f64) {
        let (x, y, z) = (self.0, self.1, self.2);
        let norm = (x * x + y * y + z * z).sqrt();
        ((z / norm).asin(), y.atan2(x))
    }
    /// WGS84 geodetic coordinates: latitude [ddeg], longitude [ddeg], altitude [m]
    pub fn to_geodetic(&self) -> (f64, f64, f64) {
        let (lat, lon, alt) = ecef2geodetic(self.0, self.1, self.2, Ellipsoid::WGS84);
        (rad2deg(lat), rad2deg(lon), alt)
    }
    /// Rotation from ECEF displacements to the local tangent plane
    pub fn rotation(&self) -> Matrix3<f64> {
        let (lat, lon) = self.latitude_longitude();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Matrix3::new(
            -sin_lon,
            cos_lon,
            0.0,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        )
    }
    /// Builds the [EnuProjection] centered on Self
    pub fn projection(&self) -> EnuProjection {
        EnuProjection {
            origin: Vector3::new(self.0, self.1, self.2),
            rotation: self.rotation(),
        }
    }
}

impl std::fmt::Display for ReferencePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "ECEF ({:.4}m {:.4}m {:.4}m)", self.0, self.1, self.2)
    }
}

/// [EnuProjection] converts ECEF positions to (East, North, Up)
/// displacements relative to one [ReferencePoint]. The rotation is
/// computed once and reused for every position.
#[derive(Debug, Clone, PartialEq)]
pub struct EnuProjection {
    origin: Vector3<f64>,
    rotation: Matrix3<f64>,
}

impl EnuProjection {
    /// Projects ECEF position (x, y, z) to (E, N, U).
    /// A missing (NaN) coordinate turns the whole output to NaN.
    pub fn project(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        if x.is_nan() || y.is_nan() || z.is_nan() {
            return (f64::NAN, f64::NAN, f64::NAN);
        }
        let enu = self.rotation * (Vector3::new(x, y, z) - self.origin);
        (enu[0], enu[1], enu[2])
    }
}

/// Converts ECEF position (x, y, z) to (East, North, Up) displacements
/// relative to reference ECEF position (ref_x, ref_y, ref_z).
/// Latitude and longitude of the local frame are geocentric.
pub fn xyz_to_enu(
    x: f64,
    y: f64,
    z: f64,
    ref_x: f64,
    ref_y: f64,
    ref_z: f64,
) -> (f64, f64, f64) {
    ReferencePoint::from_ecef(ref_x, ref_y, ref_z)
        .projection()
        .project(x, y, z)
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f64 = 1E-9;

    fn assert_close(enu: (f64, f64, f64), expected: (f64, f64, f64)) {
        assert!(
            (enu.0 - expected.0).abs() < EPSILON
                && (enu.1 - expected.1).abs() < EPSILON
                && (enu.2 - expected.2).abs() < EPSILON,
            "got {:?}, expecting {:?}",
            enu,
            expected
        );
    }

    #[test]
    fn null_at_reference() {
        for (x, y, z) in [
            (4027894.0, 307045.6, 4919474.9),
            (-2683112.2, -4307085.8, 3838538.4),
            (1111111.0, 2222222.0, 3000000.0),
        ] {
            assert_close(xyz_to_enu(x, y, z, x, y, z), (0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn missing_coordinates() {
        for (x, y, z) in [
            (f64::NAN, 1.0, 1.0),
            (1.0, f64::NAN, 1.0),
            (1.0, 1.0, f64::NAN),
        ] {
            let (e, n, u) = xyz_to_enu(x, y, z, 6378137.0, 0.0, 0.0);
            assert!(e.is_nan() && n.is_nan() && u.is_nan());
        }
    }

    #[test]
    fn equator_greenwich() {
        // local frame: E = +Y, N = +Z, U = +X
        let (rx, ry, rz) = (6378137.0, 0.0, 0.0);
        assert_close(xyz_to_enu(rx + 1.0, ry, rz, rx, ry, rz), (0.0, 0.0, 1.0));
        assert_close(xyz_to_enu(rx, ry + 1.0, rz, rx, ry, rz), (1.0, 0.0, 0.0));
        assert_close(xyz_to_enu(rx, ry, rz + 1.0, rx, ry, rz), (0.0, 1.0, 0.0));
    }

    #[test]
    fn equator_east() {
        // lon = 90°: E = -X, N = +Z, U = +Y
        let (rx, ry, rz) = (0.0, 6378137.0, 0.0);
        assert_close(xyz_to_enu(rx + 2.0, ry, rz, rx, ry, rz), (-2.0, 0.0, 0.0));
        assert_close(xyz_to_enu(rx, ry + 2.0, rz, rx, ry, rz), (0.0, 0.0, 2.0));
    }

    #[test]
    fn displacement_norm() {
        // rotation preserves lengths
        let reference = ReferencePoint::from_ecef(4027894.0, 307045.6, 4919474.9);
        let projection = reference.projection();
        let (e, n, u) = projection.project(4027894.3, 307045.2, 4919475.1);
        let norm = (e * e + n * n + u * u).sqrt();
        let expected = (0.3_f64.powi(2) + 0.4_f64.powi(2) + 0.2_f64.powi(2)).sqrt();
        assert!((norm - expected).abs() < 1E-6);
    }

    #[test]
    fn geocentric_latitude() {
        let reference = ReferencePoint::from_ecef(1.0, 1.0, 2.0_f64.sqrt());
        let (lat, lon) = reference.latitude_longitude();
        assert!((lat - std::f64::consts::FRAC_PI_4).abs() < EPSILON);
        assert!((lon - std::f64::consts::FRAC_PI_4).abs() < EPSILON);
    }

    #[test]
    fn geodetic_view() {
        let reference = ReferencePoint::from_ecef(6378137.0, 0.0, 0.0);
        let (lat, lon, alt) = reference.to_geodetic();
        assert!(lat.abs() < 1E-6);
        assert!(lon.abs() < 1E-6);
        assert!(alt.abs() < 1E-3);
    }
}
