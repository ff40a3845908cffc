//! Homogeneous vector and 4x4 matrix helpers on top of `nalgebra`.
//!
//! Points are `Point3f` (implicit `w = 1`), directions are `Vec3f`
//! (implicit `w = 0`). The raw homogeneous column is `Pv`.

use na::{Matrix4, Point3, Vector3, Vector4};

pub type Fp = f64;
pub type Vec3f = Vector3<Fp>;
pub type Point3f = Point3<Fp>;
pub type Pv = Vector4<Fp>;
pub type Mat4 = Matrix4<Fp>;

pub static EPS: Fp = 0.00001;
pub static FP_INF: Fp = Fp::INFINITY;

/// Reflects `i` around the normal `n`: `i - 2(i.n)n`.
pub fn reflect(i: &Vec3f, n: &Vec3f) -> Vec3f {
    i - n * (2.0 * i.dot(n))
}

/// Component-wise `1/v`. Zero components map to an infinity carrying the
/// sign of that zero.
pub fn inverse_components(v: &Vec3f) -> Vec3f {
    v.map(|c| if c == 0.0 { FP_INF.copysign(c) } else { 1.0 / c })
}

pub fn translation(x: Fp, y: Fp, z: Fp) -> Mat4 {
    Mat4::new_translation(&Vec3f::new(x, y, z))
}

pub fn scaling(x: Fp, y: Fp, z: Fp) -> Mat4 {
    Mat4::new_nonuniform_scaling(&Vec3f::new(x, y, z))
}

/// Rotation of `degrees` around `axis` (Rodrigues). `axis` must already be a
/// unit vector; it is not renormalized here.
pub fn rotation(degrees: Fp, axis: &Vec3f) -> Mat4 {
    let (x, y, z) = (axis.x, axis.y, axis.z);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let k = 1.0 - cos;
    #[rustfmt::skip]
    let m = Mat4::new(
        x * x + cos * (1.0 - x * x), x * y * k - z * sin,         x * z * k + y * sin,         0.0,
        x * y * k + z * sin,         y * y + cos * (1.0 - y * y), y * z * k - x * sin,         0.0,
        x * z * k - y * sin,         y * z * k + x * sin,         z * z + cos * (1.0 - z * z), 0.0,
        0.0,                         0.0,                         0.0,                         1.0,
    );
    m
}

/// General 4x4 inverse (cofactor expansion). A matrix with an exactly zero
/// determinant is returned unchanged.
pub fn inverse_or_self(m: &Mat4) -> Mat4 {
    m.try_inverse().unwrap_or(*m)
}

/// Applies `m` to a point (`w = 1`).
pub fn transform_point(m: &Mat4, p: &Point3f) -> Point3f {
    let column: Pv = m * p.to_homogeneous();
    Point3f::new(column.x, column.y, column.z)
}

/// Applies `m` to a direction (`w = 0`), so translation is ignored.
pub fn transform_vector(m: &Mat4, v: &Vec3f) -> Vec3f {
    m.transform_vector(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_close(a: &Mat4, b: &Mat4) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9, "{} != {}\n{}\n{}", x, y, a, b);
        }
    }

    #[test]
    fn test_reflect() {
        let i = Vec3f::new(1.0, -1.0, 0.0);
        let n = Vec3f::y();
        assert_eq!(reflect(&i, &n), Vec3f::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_inverse_components_signed_zero() {
        let inv = inverse_components(&Vec3f::new(2.0, 0.0, -0.0));
        assert_eq!(inv.x, 0.5);
        assert_eq!(inv.y, Fp::INFINITY);
        assert_eq!(inv.z, Fp::NEG_INFINITY);
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let v = Vec3f::zeros().normalize();
        assert!(v.x.is_nan());
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = rotation(90.0, &Vec3f::z());
        let v = transform_vector(&m, &Vec3f::x());
        assert!((v - Vec3f::y()).norm() < 1e-9);
    }

    #[test]
    fn test_translation_ignores_directions() {
        let m = translation(1.0, 2.0, 3.0);
        assert_eq!(transform_vector(&m, &Vec3f::x()), Vec3f::x());
        assert_eq!(
            transform_point(&m, &Point3f::origin()),
            Point3f::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = translation(1.0, -2.0, 0.5)
            * rotation(33.0, &Vec3f::new(1.0, 1.0, 0.0).normalize())
            * scaling(2.0, 3.0, 0.5);
        let inv = inverse_or_self(&m);
        assert_mat_close(&(inv * m), &Mat4::identity());
    }

    #[test]
    fn test_singular_inverse_returns_input() {
        let m = scaling(1.0, 0.0, 1.0);
        assert_eq!(inverse_or_self(&m), m);
    }

    #[test]
    fn test_matrix_times_column() {
        let m = scaling(2.0, 2.0, 2.0);
        let c = Pv::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(m * c, Pv::new(2.0, 4.0, 6.0, 1.0));
    }
}
