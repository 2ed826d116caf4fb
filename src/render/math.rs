//! Small vector helpers over `[f32; 3]`.

pub type Vec3 = [f32; 3];

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f32) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn length(a: Vec3) -> f32 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`; zero-length input is returned unchanged.
pub fn normalize(a: Vec3) -> Vec3 {
    let len = length(a);
    if len > 1e-6 {
        scale(a, 1.0 / len)
    } else {
        a
    }
}

/// Rotate `v` by Euler angles applied in `XYZ` order (`Rx * Ry * Rz * v`).
pub fn rotate_xyz(v: Vec3, euler: Vec3) -> Vec3 {
    let (sx, cx) = euler[0].sin_cos();
    let (sy, cy) = euler[1].sin_cos();
    let (sz, cz) = euler[2].sin_cos();

    // Rz
    let v = [v[0] * cz - v[1] * sz, v[0] * sz + v[1] * cz, v[2]];
    // Ry
    let v = [v[0] * cy + v[2] * sy, v[1], -v[0] * sy + v[2] * cy];
    // Rx
    [v[0], v[1] * cx - v[2] * sx, v[1] * sx + v[2] * cx]
}

/// `#rrggbb` as linear-ish `[0, 1]` components.
pub const fn rgb(hex: u32) -> Vec3 {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-5)
    }

    #[test]
    fn single_axis_rotations() {
        assert!(close(rotate_xyz([1.0, 0.0, 0.0], [0.0, 0.0, FRAC_PI_2]), [0.0, 1.0, 0.0]));
        assert!(close(rotate_xyz([0.0, 0.0, 1.0], [0.0, FRAC_PI_2, 0.0]), [1.0, 0.0, 0.0]));
        assert!(close(rotate_xyz([0.0, 1.0, 0.0], [FRAC_PI_2, 0.0, 0.0]), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn z_applies_before_y() {
        // Tilt +Y toward -X, then spin about Y: the tip swings onto the Z axis.
        let v = rotate_xyz([0.0, 1.0, 0.0], [0.0, FRAC_PI_2, FRAC_PI_2]);
        assert!(close(v, [0.0, 0.0, 1.0]));
    }

    #[test]
    fn cross_and_normalize() {
        assert!(close(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]));
        assert!((length(normalize([3.0, 4.0, 0.0])) - 1.0).abs() < 1e-6);
        assert_eq!(normalize([0.0; 3]), [0.0; 3]);
    }

    #[test]
    fn hex_colors() {
        assert!(close(rgb(0xff0000), [1.0, 0.0, 0.0]));
        assert!(close(rgb(0x0044aa), [0.0, 68.0 / 255.0, 170.0 / 255.0]));
    }
}
