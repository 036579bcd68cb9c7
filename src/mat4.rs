// mat4.rs — 4x4 homogeneous transform, row-major, value semantics

use glam::Vec4;
use std::ops::Mul;

/// Row-major 4x4 matrix: element `(r, c)` lives at flat index `r * 4 + c`.
///
/// Every builder and composition returns a new value, so a transform held
/// by a caller is never changed by a later operation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self::from_array([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub const fn from_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn to_array(&self) -> [f32; 16] {
        self.m
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.m
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    /// Copy of `self` with a single entry replaced.
    pub fn with_entry(mut self, row: usize, col: usize, value: f32) -> Self {
        self.m[row * 4 + col] = value;
        self
    }

    /// `self · rhs`. Order matters: the right-hand side is applied after `self`
    /// when vectors are multiplied from the left (see [`Mat4::apply_to_vector`]).
    pub fn compose(&self, rhs: &Mat4) -> Mat4 {
        let mut out = [0.0f32; 16];
        for (i, o) in out.iter_mut().enumerate() {
            let row = i / 4;
            let col = i % 4;
            let mut v = 0.0;
            for j in 0..4 {
                v += self.m[row * 4 + j] * rhs.m[j * 4 + col];
            }
            *o = v;
        }
        Mat4::from_array(out)
    }

    /// Row vector on the left: `out[i] = Σ_j v[j] · m[j][i]`.
    ///
    /// This is the same product the GPU performs when the row-major array is
    /// uploaded as a column-major uniform and multiplied as `M * v`.
    pub fn apply_to_vector(&self, v: Vec4) -> Vec4 {
        let v = v.to_array();
        let mut out = [0.0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (j, vj) in v.iter().enumerate() {
                acc += self.m[j * 4 + i] * vj;
            }
            *o = acc;
        }
        Vec4::from_array(out)
    }

    pub fn approx_eq(&self, other: &Mat4, eps: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }

    // --- elementary builders ---

    #[rustfmt::skip]
    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_array([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            x,   y,   z,   1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_array([
            x,   0.0, 0.0, 0.0,
            0.0, y,   0.0, 0.0,
            0.0, 0.0, z,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn uniform_scaling(s: f32) -> Mat4 {
        Mat4::scaling(s, s, s)
    }

    #[rustfmt::skip]
    pub fn rotation_x(theta: f32) -> Mat4 {
        let (s, c) = theta.sin_cos();
        Mat4::from_array([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_y(theta: f32) -> Mat4 {
        let (s, c) = theta.sin_cos();
        Mat4::from_array([
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_z(theta: f32) -> Mat4 {
        let (s, c) = theta.sin_cos();
        Mat4::from_array([
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    // --- fluent post-composition: `a.rotate_x(t)` == `a.compose(&rotation_x(t))` ---

    pub fn translate(&self, x: f32, y: f32, z: f32) -> Mat4 {
        self.compose(&Mat4::translation(x, y, z))
    }

    pub fn translate_z(&self, z: f32) -> Mat4 {
        self.translate(0.0, 0.0, z)
    }

    pub fn scale(&self, x: f32, y: f32, z: f32) -> Mat4 {
        self.compose(&Mat4::scaling(x, y, z))
    }

    pub fn scale_uniform(&self, s: f32) -> Mat4 {
        self.compose(&Mat4::uniform_scaling(s))
    }

    pub fn rotate_x(&self, theta: f32) -> Mat4 {
        self.compose(&Mat4::rotation_x(theta))
    }

    pub fn rotate_y(&self, theta: f32) -> Mat4 {
        self.compose(&Mat4::rotation_y(theta))
    }

    pub fn rotate_z(&self, theta: f32) -> Mat4 {
        self.compose(&Mat4::rotation_z(theta))
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.compose(&rhs)
    }
}

impl Mul<&Mat4> for &Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: &Mat4) -> Mat4 {
        self.compose(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[rustfmt::skip]
    fn sample() -> Mat4 {
        Mat4::from_array([
            1.0,  2.0,  3.0,  4.0,
            5.0,  6.0,  7.0,  8.0,
            9.0,  10.0, 11.0, 12.0,
            13.0, 14.0, 15.0, 16.0,
        ])
    }

    #[test]
    fn identity_is_neutral_on_both_sides() {
        let a = sample().rotate_x(0.3).translate(1.0, -2.0, 0.5);
        assert!(a.compose(&Mat4::IDENTITY).approx_eq(&a, EPS));
        assert!(Mat4::IDENTITY.compose(&a).approx_eq(&a, EPS));
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
    }

    #[test]
    fn compose_is_row_major_product() {
        let a = sample();
        let b = Mat4::translation(1.0, 2.0, 3.0);
        let c = a.compose(&b);
        // Row 0 of a times translation: last row of b adds a[0][3] * (1, 2, 3).
        assert_eq!(c.get(0, 0), 1.0 + 4.0 * 1.0);
        assert_eq!(c.get(0, 1), 2.0 + 4.0 * 2.0);
        assert_eq!(c.get(0, 2), 3.0 + 4.0 * 3.0);
        assert_eq!(c.get(0, 3), 4.0);
        assert_eq!(c.get(3, 0), 13.0 + 16.0 * 1.0);
    }

    #[test]
    fn compose_is_not_commutative() {
        let a = Mat4::rotation_x(0.4);
        let b = Mat4::rotation_y(0.7);
        assert!(!a.compose(&b).approx_eq(&b.compose(&a), 1e-4));
    }

    #[test]
    fn fluent_chain_appends_on_the_right() {
        let a = sample();
        let chained = a.rotate_x(0.25).rotate_y(-0.5);
        let explicit = a
            .compose(&Mat4::rotation_x(0.25))
            .compose(&Mat4::rotation_y(-0.5));
        assert_eq!(chained, explicit);

        let reversed = a
            .compose(&Mat4::rotation_y(-0.5))
            .compose(&Mat4::rotation_x(0.25));
        assert!(!chained.approx_eq(&reversed, 1e-3));
    }

    #[test]
    fn builders_leave_source_untouched() {
        let a = Mat4::rotation_z(0.1);
        let snapshot = a;
        let _ = a.scale(2.0, 3.0, 4.0).translate_z(-0.1);
        assert_eq!(a, snapshot);
    }

    #[test]
    fn apply_uses_row_vector_convention() {
        let t = Mat4::translation(1.0, 2.0, 3.0);
        let p = t.apply_to_vector(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(p, Vec4::new(1.0, 2.0, 3.0, 1.0));

        // Directions ignore translation.
        let d = t.apply_to_vector(Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(d, Vec4::new(1.0, 0.0, 0.0, 0.0));

        // Column of the matrix, not row: picks m[j][i].
        let a = sample();
        let e0 = a.apply_to_vector(Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(e0, Vec4::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn rotation_entries() {
        let t = 0.3f32;
        let (s, c) = t.sin_cos();
        let rx = Mat4::rotation_x(t);
        assert_eq!((rx.get(1, 1), rx.get(1, 2), rx.get(2, 1), rx.get(2, 2)), (c, s, -s, c));
        let ry = Mat4::rotation_y(t);
        assert_eq!((ry.get(0, 0), ry.get(0, 2), ry.get(2, 0), ry.get(2, 2)), (c, -s, s, c));
        let rz = Mat4::rotation_z(t);
        assert_eq!((rz.get(0, 0), rz.get(0, 1), rz.get(1, 0), rz.get(1, 1)), (c, s, -s, c));
    }

    #[test]
    fn rotations_preserve_length() {
        let v = Vec4::new(0.3, -0.4, 0.5, 0.0);
        let m = Mat4::IDENTITY.rotate_x(1.1).rotate_y(-2.3).rotate_z(0.7);
        let r = m.apply_to_vector(v);
        assert!((r.length() - v.length()).abs() < 1e-5);
    }

    #[test]
    fn zero_scale_collapses() {
        let m = Mat4::IDENTITY.scale(0.0, 1.0, 1.0);
        let p = m.apply_to_vector(Vec4::new(5.0, 1.0, 1.0, 1.0));
        assert_eq!(p.x, 0.0);
        assert_eq!(Mat4::uniform_scaling(2.0), Mat4::scaling(2.0, 2.0, 2.0));
    }

    #[test]
    fn mul_operator_matches_compose() {
        let a = Mat4::rotation_x(0.2);
        let b = Mat4::translation(0.0, 0.0, -0.1);
        assert_eq!(a * b, a.compose(&b));
        assert_eq!(&a * &b, a.compose(&b));
    }
}
