use super::GeometryError;
use super::measure::{dihedral, rotate_about_axis};
use nalgebra::{Point3, Vector3};

/// Relative tolerance used to decide whether a term of the closed-form solve
/// counts as zero. Scaled by the magnitudes involved, so it is unit-free.
pub const DEGENERACY_EPSILON: f64 = 1e-9;

/// Smallest `|Ny*Bz - By*Nz| / (|N|*|CB|)` for which the general branch is
/// used. Its Y and Z divide by that term, so rounding error grows as its
/// inverse.
pub const GENERAL_BRANCH_CUTOFF: f64 = 1e-6;

/// Inputs for placing one atom from three already-placed reference atoms.
///
/// `c` is the pivot the new atom bonds to; `angle` is the bond angle
/// `b`-`c`-new and `dihedral` the torsion `a`-`b`-`c`-new, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSpec {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
    pub c: Point3<f64>,
    pub length: f64,
    pub angle: f64,
    pub dihedral: f64,
}

impl PlacementSpec {
    pub fn new(
        a: Point3<f64>,
        b: Point3<f64>,
        c: Point3<f64>,
        length: f64,
        angle: f64,
        dihedral: f64,
    ) -> Self {
        Self {
            a,
            b,
            c,
            length,
            angle,
            dihedral,
        }
    }
}

/// Which closed-form expression resolves Y and Z once X is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBranch {
    /// Solves the plane and bond-angle equations jointly; divides by
    /// `Ny*Bz - By*Nz`.
    General,
    /// Used when that divisor is negligible in every axis order: solves the
    /// plane and bond-length equations instead, dividing by `Nz`.
    Reduced,
}

/// Cyclic axis orders the solve may run in. Each is a proper rotation, so a
/// solution found in a permuted frame is equally valid once mapped back.
const AXIS_ORDERS: [[usize; 3]; 3] = [[0, 1, 2], [1, 2, 0], [2, 0, 1]];

/// Computes the position of a new atom bonded to `c`.
///
/// The result lies `length` from `c`, makes `angle` degrees with `b` at `c`,
/// and has torsion `dihedral` degrees about the `b`-`c` bond relative to `a`.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] when the inputs do not define a
/// reference frame (coincident or collinear points, non-positive length,
/// non-finite values) or when the closed-form solve has no real solution.
pub fn place_point(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    length: f64,
    angle: f64,
    dihedral: f64,
) -> Result<Point3<f64>, GeometryError> {
    place_point_with_tolerance(
        &PlacementSpec::new(*a, *b, *c, length, angle, dihedral),
        DEGENERACY_EPSILON,
    )
}

pub fn place_point_with_tolerance(
    spec: &PlacementSpec,
    tolerance: f64,
) -> Result<Point3<f64>, GeometryError> {
    validate(spec, tolerance)?;

    let ca = spec.a - spec.c;
    let cb = spec.b - spec.c;

    // 1. Any point satisfying the bond length and bond angle, in the a-b-c plane.
    let offset = solve_in_plane(&ca, &cb, spec.length, spec.angle, tolerance)?;
    let seed = spec.c + offset;

    // 2. Spin it about the b-c bond until the torsion matches.
    let current = dihedral(&spec.a, &spec.b, &spec.c, &seed);
    rotate_about_axis(&seed, &spec.b, &(spec.c - spec.b), spec.dihedral - current)
}

fn validate(spec: &PlacementSpec, tolerance: f64) -> Result<(), GeometryError> {
    let all_finite = [spec.a, spec.b, spec.c]
        .iter()
        .flat_map(|p| p.coords.iter())
        .chain([spec.length, spec.angle, spec.dihedral].iter())
        .all(|v| v.is_finite());
    if !all_finite {
        return Err(GeometryError::Degenerate {
            reason: "non-finite coordinate or internal coordinate",
        });
    }
    if spec.length <= 0.0 {
        return Err(GeometryError::Degenerate {
            reason: "bond length must be positive",
        });
    }

    let ca = spec.a - spec.c;
    let cb = spec.b - spec.c;
    let ab = spec.b - spec.a;
    if ca.norm() <= tolerance || cb.norm() <= tolerance || ab.norm() <= tolerance {
        return Err(GeometryError::Degenerate {
            reason: "reference points coincide",
        });
    }
    if ca.cross(&cb).norm() <= tolerance * ca.norm() * cb.norm() {
        return Err(GeometryError::Degenerate {
            reason: "reference points are collinear",
        });
    }
    Ok(())
}

fn solve_in_plane(
    ca: &Vector3<f64>,
    cb: &Vector3<f64>,
    length: f64,
    angle: f64,
    tolerance: f64,
) -> Result<Vector3<f64>, GeometryError> {
    let frames = AXIS_ORDERS.map(|order| {
        let frame = PlaneFrame::new(&permute(ca, order), &permute(cb, order), length, angle);
        (order, frame)
    });
    let (order, frame, branch) =
        select_frame(&frames, tolerance).ok_or(GeometryError::Degenerate {
            reason: "no well-conditioned frame for the closed-form solve",
        })?;
    let local = frame.solve(branch, tolerance)?;
    Ok(unpermute(&local, order))
}

/// Picks the axis order whose general-branch divisor is largest relative to
/// its scale. The reduced branch is only tried when no order clears
/// [`GENERAL_BRANCH_CUTOFF`].
fn select_frame(
    frames: &[([usize; 3], PlaneFrame)],
    tolerance: f64,
) -> Option<([usize; 3], &PlaneFrame, FrameBranch)> {
    let best = |score: fn(&PlaneFrame) -> f64| {
        frames
            .iter()
            .max_by(|(_, lhs), (_, rhs)| score(lhs).total_cmp(&score(rhs)))
    };

    if let Some((order, frame)) = best(PlaneFrame::general_conditioning)
        .filter(|(_, frame)| frame.general_conditioning() > GENERAL_BRANCH_CUTOFF)
    {
        return Some((*order, frame, FrameBranch::General));
    }
    best(PlaneFrame::reduced_conditioning)
        .filter(|(_, frame)| frame.reduced_conditioning() > tolerance)
        .map(|(order, frame)| (*order, frame, FrameBranch::Reduced))
}

fn permute(v: &Vector3<f64>, order: [usize; 3]) -> Vector3<f64> {
    Vector3::new(v[order[0]], v[order[1]], v[order[2]])
}

fn unpermute(v: &Vector3<f64>, order: [usize; 3]) -> Vector3<f64> {
    let mut out = Vector3::zeros();
    for (i, &axis) in order.iter().enumerate() {
        out[axis] = v[i];
    }
    out
}

/// Coefficients of the three constraints with `c` at the origin:
/// `P·N = 0`, `P·CB = F`, `|P|² = L²`.
struct PlaneFrame {
    nx: f64,
    ny: f64,
    nz: f64,
    bx: f64,
    by: f64,
    bz: f64,
    f: f64,
    length: f64,
    denom: f64,
    det: f64,
    normal_norm: f64,
    cb_norm: f64,
}

impl PlaneFrame {
    fn new(ca: &Vector3<f64>, cb: &Vector3<f64>, length: f64, angle: f64) -> Self {
        let (ax, ay, az) = (ca.x, ca.y, ca.z);
        let (bx, by, bz) = (cb.x, cb.y, cb.z);

        // Plane normal
        let nx = (ay * bz) - (az * by);
        let ny = (az * bx) - (ax * bz);
        let nz = (ax * by) - (ay * bx);

        // Dot product constant
        let cb_norm = (bx * bx + by * by + bz * bz).sqrt();
        let f = cb_norm * length * angle.to_radians().cos();

        let denom = (ny * ny) * (bx * bx + bz * bz) + (nx * nx) * (by * by + bz * bz)
            - (2.0 * nx * bx * bz * nz)
            + (bx * bx + by * by) * (nz * nz)
            - (2.0 * ny * by) * (nx * bx + bz * nz);

        Self {
            nx,
            ny,
            nz,
            bx,
            by,
            bz,
            f,
            length,
            denom,
            det: ny * bz - by * nz,
            normal_norm: (nx * nx + ny * ny + nz * nz).sqrt(),
            cb_norm,
        }
    }

    fn general_conditioning(&self) -> f64 {
        self.det.abs() / (self.normal_norm * self.cb_norm)
    }

    fn reduced_conditioning(&self) -> f64 {
        self.nz.abs() / self.normal_norm
    }

    fn solve(&self, branch: FrameBranch, tolerance: f64) -> Result<Vector3<f64>, GeometryError> {
        let Self {
            nx,
            ny,
            nz,
            bx,
            by,
            bz,
            f,
            length,
            denom,
            det,
            ..
        } = *self;

        let scale = (self.normal_norm * self.cb_norm).powi(2);
        if denom.abs() <= tolerance * scale {
            return Err(GeometryError::Degenerate {
                reason: "closed-form denominator vanishes",
            });
        }

        let discriminant = clamp_radicand(
            denom * length * length - f * f * (nx * nx + ny * ny + nz * nz),
            tolerance * scale * length * length,
            "negative discriminant: bond angle cannot be satisfied",
        )?;
        let constant = (det * det * discriminant).sqrt();

        let x = ((ny * ny * bx * f) - (nx * ny * by * f) + (f * nz) * (-nx * bz + bx * nz)
            + constant)
            / denom;

        let (y, z) = match branch {
            FrameBranch::General => {
                let y = ((nx * nx * by * f) * det + nz * (-f * det * det + bx * constant)
                    - nx * (ny * ny * bx * bz * f - ny * bx * by * f * nz + bz * constant))
                    / (det * denom);
                let z = ((nx * nx * bz * f) * det + (ny * f) * det * det
                    + (nx * bx * f * nz) * (-det)
                    - ny * bx * constant
                    + nx * by * constant)
                    / (det * denom);
                (y, z)
            }
            FrameBranch::Reduced => {
                let planar = ny * ny + nz * nz;
                let radicand = clamp_radicand(
                    nz * nz * (-nx * nx * x * x + planar * (length - x) * (length + x)),
                    tolerance * nz * nz * planar * length * length,
                    "negative discriminant in reduced frame",
                )?;
                let constant1 = radicand.sqrt();
                let y = ((-nx * ny * x) + constant1) / planar;
                let z = -(nx * nz * nz * x + ny * constant1) / (nz * planar);
                (y, z)
            }
        };

        Ok(Vector3::new(x, y, z))
    }
}

/// Treats rounding-level negatives as zero; anything more negative means the
/// constraints have no real solution.
fn clamp_radicand(
    value: f64,
    allowance: f64,
    reason: &'static str,
) -> Result<f64, GeometryError> {
    if value >= 0.0 {
        Ok(value)
    } else if value >= -allowance {
        Ok(0.0)
    } else {
        Err(GeometryError::Degenerate { reason })
    }
}
