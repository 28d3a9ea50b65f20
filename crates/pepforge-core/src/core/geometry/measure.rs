use super::GeometryError;
use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// Shortest vector length treated as a usable direction.
const MIN_VECTOR_NORM: f64 = 1e-12;

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

pub fn rotation_from_axis_angle(
    axis: &Vector3<f64>,
    angle_degrees: f64,
) -> Result<Rotation3<f64>, GeometryError> {
    let axis = Unit::try_new(*axis, MIN_VECTOR_NORM).ok_or(GeometryError::Degenerate {
        reason: "rotation axis has zero length",
    })?;
    Ok(Rotation3::from_axis_angle(&axis, angle_degrees.to_radians()))
}

/// Rotates `point` by `angle_degrees` (right-handed) about the line through
/// `pivot` with direction `axis`.
pub fn rotate_about_axis(
    point: &Point3<f64>,
    pivot: &Point3<f64>,
    axis: &Vector3<f64>,
    angle_degrees: f64,
) -> Result<Point3<f64>, GeometryError> {
    let rotation = rotation_from_axis_angle(axis, angle_degrees)?;
    Ok(pivot + rotation * (point - pivot))
}

/// Angle at `b` formed by `a`-`b`-`c`, in degrees within [0, 180].
pub fn bond_angle(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Result<f64, GeometryError> {
    let ba = a - b;
    let bc = c - b;
    let norms = ba.norm() * bc.norm();
    if norms < MIN_VECTOR_NORM {
        return Err(GeometryError::Degenerate {
            reason: "bond angle arm has zero length",
        });
    }
    let cosine = (ba.dot(&bc) / norms).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

/// Torsion angle of `a`-`b`-`c`-`d` about the `b`-`c` bond, in degrees.
///
/// Uses the IUPAC sign convention: looking down `b`→`c`, a clockwise turn
/// from `a` to `d` is positive. Returns 0.0 rather than NaN when either plane
/// is undefined.
pub fn dihedral(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let b1 = b - a;
    let b2 = c - b;
    let b3 = d - c;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    y.atan2(x).to_degrees()
}

/// Wraps an angle in degrees into (-180, 180].
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn bond_angle_of_right_angle_is_ninety() {
        let angle = bond_angle(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::origin(),
            &Point3::new(0.0, 2.0, 0.0),
        )
        .unwrap();
        assert!((angle - 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn bond_angle_of_straight_line_is_one_eighty() {
        let angle = bond_angle(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::origin(),
            &Point3::new(3.0, 0.0, 0.0),
        )
        .unwrap();
        assert!((angle - 180.0).abs() < TOLERANCE);
    }

    #[test]
    fn bond_angle_with_coincident_points_is_degenerate() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(matches!(
            bond_angle(&p, &p, &Point3::origin()),
            Err(GeometryError::Degenerate { .. })
        ));
    }

    #[test]
    fn dihedral_follows_iupac_sign_convention() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::origin();
        let c = Point3::new(0.0, 0.0, 1.0);

        let cis = Point3::new(1.0, 0.0, 1.0);
        let trans = Point3::new(-1.0, 0.0, 1.0);
        let plus_ninety = Point3::new(0.0, 1.0, 1.0);
        let minus_ninety = Point3::new(0.0, -1.0, 1.0);

        assert!(dihedral(&a, &b, &c, &cis).abs() < TOLERANCE);
        assert!((dihedral(&a, &b, &c, &trans).abs() - 180.0).abs() < TOLERANCE);
        assert!((dihedral(&a, &b, &c, &plus_ninety) - 90.0).abs() < TOLERANCE);
        assert!((dihedral(&a, &b, &c, &minus_ninety) + 90.0).abs() < TOLERANCE);
    }

    #[test]
    fn dihedral_of_collinear_points_is_zero_not_nan() {
        let value = dihedral(
            &Point3::origin(),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
            &Point3::new(3.0, 0.0, 0.0),
        );
        assert_eq!(value, 0.0);
    }

    #[test]
    fn rotate_about_axis_is_right_handed() {
        let rotated = rotate_about_axis(
            &Point3::new(2.0, 0.0, 5.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Vector3::z(),
            90.0,
        )
        .unwrap();
        assert!((rotated - Point3::new(1.0, 1.0, 5.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rotate_about_zero_axis_is_degenerate() {
        assert!(
            rotate_about_axis(&Point3::origin(), &Point3::origin(), &Vector3::zeros(), 10.0)
                .is_err()
        );
    }

    #[test]
    fn wrap_degrees_maps_into_half_open_range() {
        assert!((wrap_degrees(370.0) - 10.0).abs() < TOLERANCE);
        assert!((wrap_degrees(-190.0) - 170.0).abs() < TOLERANCE);
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert!((wrap_degrees(-370.0) + 10.0).abs() < TOLERANCE);
    }

    #[test]
    fn distance_is_euclidean() {
        let d = distance(&Point3::origin(), &Point3::new(3.0, 4.0, 0.0));
        assert!((d - 5.0).abs() < TOLERANCE);
    }
}
