//! CPU reference of the offscreen height-field solve.
//!
//! The solve pass in `shaders/height_field_solve.wgsl` must stay a texel-wise
//! mirror of [`sample`]; tests run against this implementation since the GPU
//! output is not read back.

use bevy::math::{Vec2, Vec4};

/// Standing-ripple sources: (center in [-1,1]^2, amplitude, wavenumber).
const RIPPLES: [(Vec2, f32, f32); 3] = [
    (Vec2::new(-0.35, 0.2), 0.35, 18.0),
    (Vec2::new(0.4, -0.3), 0.28, 24.0),
    (Vec2::new(0.05, 0.45), 0.22, 30.0),
];

const DETAIL_AMPLITUDE: f32 = 0.05;
/// Detail wavenumber per unit of resolution, so higher-resolution targets
/// resolve proportionally finer ripples.
const DETAIL_SCALE: f32 = 0.05;

const EDGE_START: f32 = 0.85;
const EDGE_END: f32 = 1.0;

/// Height and analytic gradient at a UV coordinate for a target of the
/// given resolution. Texel layout: (height, dh/dx, dh/dz, 1). Pure and
/// finite for every input in [0, 1]^2.
pub fn sample(uv: Vec2, resolution: f32) -> Vec4 {
    let p = uv * 2.0 - Vec2::ONE;

    let mut height = 0.0_f32;
    let mut grad = Vec2::ZERO;

    for (center, amplitude, wavenumber) in RIPPLES {
        let offset = p - center;
        let d = offset.length().max(1e-4);
        let envelope = (-2.0 * d).exp();
        let (sin_kd, cos_kd) = (wavenumber * d).sin_cos();

        height += amplitude * cos_kd * envelope;
        let radial = amplitude * envelope * (-wavenumber * sin_kd - 2.0 * cos_kd);
        grad += offset * (radial / d);
    }

    let k = resolution * DETAIL_SCALE;
    let (sx, cx) = (p.x * k).sin_cos();
    let (sy, cy) = (p.y * k).sin_cos();
    height += DETAIL_AMPLITUDE * sx * sy;
    grad.x += DETAIL_AMPLITUDE * k * cx * sy;
    grad.y += DETAIL_AMPLITUDE * k * sx * cy;

    // Damp toward the open boundary; the gradient is damped by the same
    // factor, which is close enough for shading.
    let damp = (1.0 - smoothstep(EDGE_START, EDGE_END, p.x.abs()))
        * (1.0 - smoothstep(EDGE_START, EDGE_END, p.y.abs()));
    height *= damp;
    grad *= damp;

    Vec4::new(height, grad.x, grad.y, 1.0)
}

/// Evaluate the full texel grid at texel centers, row-major.
pub fn solve_grid(resolution: u32) -> Vec<Vec4> {
    let inv = 1.0 / resolution as f32;
    let mut texels = Vec::with_capacity((resolution * resolution) as usize);
    for j in 0..resolution {
        let v = (j as f32 + 0.5) * inv;
        for i in 0..resolution {
            let u = (i as f32 + 0.5) * inv;
            texels.push(sample(Vec2::new(u, v), resolution as f32));
        }
    }
    texels
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every texel must be a finite float for the formats the solver
    /// renders into.
    #[test]
    fn no_nan_or_inf_anywhere() {
        for resolution in [64_u32, 128] {
            for texel in solve_grid(resolution) {
                assert!(texel.x.is_finite());
                assert!(texel.y.is_finite());
                assert!(texel.z.is_finite());
                assert_eq!(texel.w, 1.0);
            }
        }
    }

    #[test]
    fn heights_are_bounded() {
        for texel in solve_grid(64) {
            assert!(texel.x.abs() < 2.0, "runaway height: {}", texel.x);
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(solve_grid(64), solve_grid(64));
    }

    /// Ripple centers are singular-looking but must still be finite.
    #[test]
    fn finite_at_ripple_centers() {
        for (center, _, _) in RIPPLES {
            let uv = (center + Vec2::ONE) * 0.5;
            let texel = sample(uv, 256.0);
            assert!(texel.x.is_finite() && texel.y.is_finite() && texel.z.is_finite());
        }
    }

    #[test]
    fn boundary_is_damped() {
        let interior = sample(Vec2::new(0.325, 0.6), 128.0).x.abs();
        let corner = sample(Vec2::new(0.0, 0.0), 128.0).x.abs();
        let edge = sample(Vec2::new(1.0, 0.5), 128.0).x.abs();
        assert_eq!(corner, 0.0);
        assert_eq!(edge, 0.0);
        // sanity: the field is not identically zero
        assert!(interior > 0.0);
    }
}
