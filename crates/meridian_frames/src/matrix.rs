//! 3×3 rotation matrices and 3-vectors.
//!
//! Rotations follow the "rotate the frame" convention: [`rotate_x`],
//! [`rotate_y`] and [`rotate_z`] premultiply an existing matrix, so a
//! sequence of calls applies rotations in the order written.

/// Row-major 3×3 matrix.
pub type Mat3 = [[f64; 3]; 3];

/// Cartesian 3-vector.
pub type Vec3 = [f64; 3];

/// Identity matrix.
pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Rotate `r` about the x-axis by `phi` radians.
pub fn rotate_x(phi: f64, r: &mut Mat3) {
    let (s, c) = phi.sin_cos();
    for j in 0..3 {
        let a1 = c * r[1][j] + s * r[2][j];
        let a2 = -s * r[1][j] + c * r[2][j];
        r[1][j] = a1;
        r[2][j] = a2;
    }
}

/// Rotate `r` about the y-axis by `theta` radians.
pub fn rotate_y(theta: f64, r: &mut Mat3) {
    let (s, c) = theta.sin_cos();
    for j in 0..3 {
        let a0 = c * r[0][j] - s * r[2][j];
        let a2 = s * r[0][j] + c * r[2][j];
        r[0][j] = a0;
        r[2][j] = a2;
    }
}

/// Rotate `r` about the z-axis by `psi` radians.
pub fn rotate_z(psi: f64, r: &mut Mat3) {
    let (s, c) = psi.sin_cos();
    for j in 0..3 {
        let a0 = c * r[0][j] + s * r[1][j];
        let a1 = -s * r[0][j] + c * r[1][j];
        r[0][j] = a0;
        r[1][j] = a1;
    }
}

/// Matrix product `a · b`.
pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Transpose of `m`.
pub fn transpose(m: &Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Matrix-vector product `m · v`.
pub fn mat_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
}

/// Transposed matrix-vector product `mᵀ · v`.
pub fn mat_t_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [
        m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2],
        m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2],
        m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2],
    ]
}

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(v: &Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Modulus and unit vector. A null vector is returned unchanged with
/// modulus zero.
pub fn normalize(v: &Vec3) -> (f64, Vec3) {
    let r = norm(v);
    if r == 0.0 {
        (0.0, *v)
    } else {
        (r, [v[0] / r, v[1] / r, v[2] / r])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-15;

    fn close(a: &Vec3, b: &Vec3, eps: f64) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < eps)
    }

    #[test]
    fn rotate_z_quarter_turn_moves_frame() {
        let mut r = IDENTITY;
        rotate_z(FRAC_PI_2, &mut r);
        // A fixed vector along +x appears along −y in the rotated frame.
        assert!(close(&mat_vec(&r, &[1.0, 0.0, 0.0]), &[0.0, -1.0, 0.0], EPS));
    }

    #[test]
    fn rotate_x_and_y_quarter_turns() {
        let mut rx = IDENTITY;
        rotate_x(FRAC_PI_2, &mut rx);
        assert!(close(&mat_vec(&rx, &[0.0, 1.0, 0.0]), &[0.0, 0.0, -1.0], EPS));

        let mut ry = IDENTITY;
        rotate_y(FRAC_PI_2, &mut ry);
        assert!(close(&mat_vec(&ry, &[0.0, 0.0, 1.0]), &[-1.0, 0.0, 0.0], EPS));
    }

    #[test]
    fn sequential_rotations_compose() {
        let mut r = IDENTITY;
        rotate_z(0.3, &mut r);
        rotate_x(-0.7, &mut r);

        let mut a = IDENTITY;
        rotate_z(0.3, &mut a);
        let mut b = IDENTITY;
        rotate_x(-0.7, &mut b);
        let composed = mat_mul(&b, &a);
        for i in 0..3 {
            assert!(close(&r[i], &composed[i], EPS));
        }
    }

    #[test]
    fn transpose_inverts_rotation() {
        let mut r = IDENTITY;
        rotate_y(1.1, &mut r);
        rotate_z(-0.4, &mut r);
        let v = [0.3, -0.5, 0.81];
        let back = mat_t_vec(&r, &mat_vec(&r, &v));
        assert!(close(&back, &v, EPS));
        let rt = transpose(&r);
        assert!(close(&mat_vec(&rt, &v), &mat_t_vec(&r, &v), EPS));
    }

    #[test]
    fn cross_and_normalize() {
        assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        let (r, u) = normalize(&[3.0, 0.0, 4.0]);
        assert_eq!(r, 5.0);
        assert!(close(&u, &[0.6, 0.0, 0.8], EPS));
        assert_eq!(normalize(&[0.0; 3]), (0.0, [0.0; 3]));
    }
}
