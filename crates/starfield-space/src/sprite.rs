//! Procedural round sprite shared by both point clouds.

/// Sprite edge length in texels.
pub const SPRITE_SIZE: u32 = 32;

/// Gradient stops as `(offset, alpha)`, offsets ascending in `[0, 1]`.
const ALPHA_STOPS: [(f32, f32); 3] = [(0.0, 1.0), (0.5, 0.5), (1.0, 0.0)];

/// Alpha at normalized radius `t`, clamped to the outer stops.
pub fn gradient_alpha(t: f32) -> f32 {
    let (first_offset, first_alpha) = ALPHA_STOPS[0];
    if t <= first_offset {
        return first_alpha;
    }
    for pair in ALPHA_STOPS.windows(2) {
        let (t0, a0) = pair[0];
        let (t1, a1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            return a0 + (a1 - a0) * f;
        }
    }
    ALPHA_STOPS[ALPHA_STOPS.len() - 1].1
}

/// White RGBA8 disc with a radial alpha falloff, sampled at texel centers.
pub fn radial_gradient_sprite() -> Vec<u8> {
    let center = SPRITE_SIZE as f32 / 2.0;
    let radius = center;
    let mut pixels = Vec::with_capacity((SPRITE_SIZE * SPRITE_SIZE * 4) as usize);

    for y in 0..SPRITE_SIZE {
        for x in 0..SPRITE_SIZE {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let t = (dx * dx + dy * dy).sqrt() / radius;
            let alpha = (gradient_alpha(t) * 255.0).round() as u8;
            pixels.extend_from_slice(&[255, 255, 255, alpha]);
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(pixels: &[u8], x: u32, y: u32) -> u8 {
        pixels[((y * SPRITE_SIZE + x) * 4 + 3) as usize]
    }

    #[test]
    fn test_stop_values() {
        assert_eq!(gradient_alpha(0.0), 1.0);
        assert!((gradient_alpha(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(gradient_alpha(1.0), 0.0);
        assert_eq!(gradient_alpha(1.7), 0.0);
        assert!((gradient_alpha(0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_sprite_dimensions() {
        assert_eq!(radial_gradient_sprite().len(), 32 * 32 * 4);
    }

    #[test]
    fn test_center_opaque_corners_clear() {
        let pixels = radial_gradient_sprite();
        assert!(alpha_at(&pixels, 15, 15) > 240);
        assert!(alpha_at(&pixels, 16, 16) > 240);
        assert_eq!(alpha_at(&pixels, 0, 0), 0);
        assert_eq!(alpha_at(&pixels, 31, 31), 0);
    }

    #[test]
    fn test_rgb_is_white() {
        let pixels = radial_gradient_sprite();
        for (i, texel) in pixels.chunks_exact(4).enumerate() {
            assert_eq!(&texel[..3], &[255, 255, 255], "texel {i} is not white");
        }
    }

    #[test]
    fn test_alpha_falls_off_radially() {
        let pixels = radial_gradient_sprite();
        let row: Vec<u8> = (16..32).map(|x| alpha_at(&pixels, x, 16)).collect();
        assert!(
            row.windows(2).all(|w| w[0] >= w[1]),
            "alpha should not increase outward: {row:?}"
        );
    }

    #[test]
    fn test_sprite_is_symmetric() {
        let pixels = radial_gradient_sprite();
        for y in 0..SPRITE_SIZE {
            for x in 0..SPRITE_SIZE {
                assert_eq!(
                    alpha_at(&pixels, x, y),
                    alpha_at(&pixels, SPRITE_SIZE - 1 - x, y)
                );
            }
        }
    }
}
