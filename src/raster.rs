use image::{Rgba, RgbaImage};

/// Minimal painting primitives over an opaque canvas.
///
/// The illustration never needs compositing against transparency: the paper
/// is filled first, everything after is straight source-over on RGB.
pub fn blank(width: u32, height: u32, gray: u8) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([gray, gray, gray, 255]))
}

pub fn blend_px(img: &mut RgbaImage, x: i64, y: i64, color: [u8; 3], alpha: f64) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    let px = img.get_pixel_mut(x as u32, y as u32);
    for (dst, &src) in px.0.iter_mut().zip(color.iter()) {
        *dst = (f64::from(src) * a + f64::from(*dst) * (1.0 - a)).round() as u8;
    }
    px.0[3] = 255;
}

/// Hard-edged filled dot, diameter in pixels.
pub fn dot(img: &mut RgbaImage, cx: f64, cy: f64, diameter: f64, color: [u8; 3], alpha: f64) {
    let r = diameter / 2.0;
    if r <= 0.0 {
        return;
    }
    let x0 = (cx - r).floor() as i64;
    let x1 = (cx + r).ceil() as i64;
    let y0 = (cy - r).floor() as i64;
    let y1 = (cy + r).ceil() as i64;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                blend_px(img, x, y, color, alpha);
            }
        }
    }
}

/// Solid one-pixel vertical line, endpoints inclusive and in any order.
pub fn vline(img: &mut RgbaImage, x: f64, y0: f64, y1: f64, color: [u8; 3]) {
    let x = x.round() as i64;
    let (top, bottom) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    for y in top.round() as i64..=bottom.round() as i64 {
        blend_px(img, x, y, color, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_ignores_out_of_bounds() {
        let mut img = blank(4, 4, 240);
        blend_px(&mut img, -1, 0, [0, 0, 0], 1.0);
        blend_px(&mut img, 0, 99, [0, 0, 0], 1.0);
        assert!(img.pixels().all(|p| p.0 == [240, 240, 240, 255]));
    }

    #[test]
    fn full_alpha_replaces_the_pixel() {
        let mut img = blank(4, 4, 240);
        blend_px(&mut img, 1, 2, [15, 71, 140], 1.0);
        assert_eq!(img.get_pixel(1, 2).0, [15, 71, 140, 255]);
    }

    #[test]
    fn dot_covers_its_center() {
        let mut img = blank(9, 9, 240);
        dot(&mut img, 4.5, 4.5, 3.0, [0, 0, 0], 1.0);
        assert_eq!(img.get_pixel(4, 4).0, [0, 0, 0, 255]);
        // Far corner untouched.
        assert_eq!(img.get_pixel(0, 0).0, [240, 240, 240, 255]);
    }

    #[test]
    fn vline_accepts_reversed_endpoints() {
        let mut img = blank(3, 8, 240);
        vline(&mut img, 1.0, 6.0, 2.0, [0, 0, 0]);
        for y in 2..=6 {
            assert_eq!(img.get_pixel(1, y).0, [0, 0, 0, 255]);
        }
        assert_eq!(img.get_pixel(1, 1).0, [240, 240, 240, 255]);
    }
}
