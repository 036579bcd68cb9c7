// mesh.rs — unit sphere as one spiralling triangle strip with equirectangular UVs

use std::f64::consts::PI;

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl SphereMesh {
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn flat_uvs(&self) -> &[f32] {
        bytemuck::cast_slice(&self.uvs)
    }
}

/// Number of strip vertices produced by [`build_sphere`].
pub fn strip_vertex_count(h_div: u32, v_div: u32) -> usize {
    2 * h_div as usize * (v_div as usize + 1)
}

/// Tessellate a unit sphere into a single triangle strip.
///
/// The strip walks every latitude band once, two vertices per longitude
/// step. The lower vertex of each pair is lifted by `h / h_div` of a band so
/// the strip climbs one band per revolution and joins the next band without
/// a seam. Latitude is eased with a sine so rows bunch up towards the poles.
///
/// `u` is `v + h / h_div`: the integer band index plus the longitude
/// fraction, not a per-band `v / v_div`. It keeps growing by one per band;
/// the sampler repeats horizontally, so only its fractional part matters,
/// and consecutive strip vertices never jump across the texture.
///
/// The last revolution's upper vertices sit one full band above the top
/// row, just past the north pole, which closes the cap.
pub fn build_sphere(h_div: u32, v_div: u32) -> SphereMesh {
    let count = strip_vertex_count(h_div, v_div);
    let mut positions = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);

    let mut push = |h: u32, v: u32, offset: f64| {
        let h_frac = h as f64 / h_div as f64;
        let phi = 2.0 * PI * h_frac;
        let theta0 = PI * ((v as f64 + offset) / v_div as f64 - 0.5);
        let theta = theta0.sin() * PI / 2.0;

        positions.push([
            (phi.cos() * theta.cos()) as f32,
            theta.sin() as f32,
            (phi.sin() * theta.cos()) as f32,
        ]);
        uvs.push([(v as f64 + h_frac) as f32, ((1.0 - theta0.sin()) / 2.0) as f32]);
    };

    for v in 0..=v_div {
        for h in 0..h_div {
            let h_frac = h as f64 / h_div as f64;
            let lower = if v == 0 { 0.0 } else { h_frac - 1.0 };
            let upper = if v == v_div { 1.0 } else { h_frac };
            push(h, v, lower);
            push(h, v, upper);
        }
    }

    SphereMesh { positions, uvs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_matches_formula() {
        let mesh = build_sphere(32, 64);
        assert_eq!(mesh.vertex_count(), 4160);
        assert_eq!(mesh.uvs.len(), 4160);
        assert_eq!(mesh.flat_positions().len(), 4160 * 3);
        assert_eq!(mesh.flat_uvs().len(), 4160 * 2);

        for (h, v) in [(1, 1), (3, 5), (8, 2), (17, 33)] {
            let n = build_sphere(h, v).vertex_count() as usize;
            assert_eq!(n, strip_vertex_count(h, v));
            assert_eq!(n % 2, 0);
            assert_eq!(n % h as usize, 0);
        }
    }

    #[test]
    fn every_vertex_is_on_the_unit_sphere() {
        let mesh = build_sphere(32, 64);
        for p in &mesh.positions {
            let r2 = p[0] * p[0] + p[1] * p[1] + p[2] * p[2];
            assert!((r2 - 1.0).abs() < 1e-5, "off sphere: {p:?}");
        }
    }

    #[test]
    fn strip_starts_at_south_pole() {
        let mesh = build_sphere(16, 8);
        let first = mesh.positions[0];
        assert!((first[1] + 1.0).abs() < 1e-6);
        assert!((mesh.uvs[0][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn top_row_reaches_one_band_past_the_north_pole() {
        let (h_div, v_div) = (32u32, 64u32);
        let mesh = build_sphere(h_div, v_div);
        let c = (PI / v_div as f64).cos();
        let expected_y = (c * PI / 2.0).sin();
        let expected_v = (1.0 - c) / 2.0;

        for h in [0u32, 5, h_div - 1] {
            let i = 2 * (v_div * h_div + h) as usize + 1;
            let phi = 2.0 * PI * h as f64 / h_div as f64;
            let ring = (c * PI / 2.0).cos();
            let p = mesh.positions[i];
            assert!((p[0] as f64 - phi.cos() * ring).abs() < 1e-6, "{p:?}");
            assert!((p[1] as f64 - expected_y).abs() < 1e-6, "{p:?}");
            assert!((p[2] as f64 - phi.sin() * ring).abs() < 1e-6, "{p:?}");
            assert!((mesh.uvs[i][1] as f64 - expected_v).abs() < 1e-6);
        }

        // Not collapsed onto the pole itself.
        let last = *mesh.positions.last().unwrap();
        assert!(last[1] < 1.0);
        assert!(mesh.uvs.last().unwrap()[1] > 0.0);
    }

    #[test]
    fn texture_v_stays_in_unit_range() {
        let mesh = build_sphere(32, 64);
        for uv in &mesh.uvs {
            assert!((0.0..=1.0).contains(&uv[1]), "v out of range: {uv:?}");
        }
    }

    #[test]
    fn u_advances_monotonically_along_the_strip() {
        let mesh = build_sphere(8, 4);
        for pair in mesh.uvs.windows(2) {
            assert!(pair[1][0] >= pair[0][0]);
            assert!(pair[1][0] - pair[0][0] <= 1.0 / 8.0 + 1e-6);
        }
        // Fractional part of u is the longitude fraction.
        let h = 3usize;
        let u = mesh.uvs[2 * (8 + h)][0];
        assert!((u.fract() - h as f32 / 8.0).abs() < 1e-6);
    }

    #[test]
    fn latitude_is_sine_eased() {
        // Band 1 of 4 sits at theta0 = -pi/4; eased latitude is sin(-pi/4) * pi/2.
        let mesh = build_sphere(4, 4);
        let upper_of_first_pair = mesh.positions[1];
        let expected = ((-PI / 4.0).sin() * PI / 2.0).sin() as f32;
        // First pair of row 0 uses offset h/h_div = 0, i.e. band 0 exactly.
        assert!((upper_of_first_pair[1] + 1.0).abs() < 1e-6);

        // Row 1, h = 0: upper vertex sits exactly on band 1.
        let row1_upper = mesh.positions[2 * 4 + 1];
        assert!((row1_upper[1] - expected).abs() < 1e-6);
        let linear = (-PI / 4.0).sin() as f32;
        assert!((row1_upper[1] - linear).abs() > 1e-3);
    }
}
