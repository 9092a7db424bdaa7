use crate::foundation::core::{Canvas, Rgba};
use crate::foundation::math::fract;

/// A 2D pixel field of straight-alpha `f32` colors, row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// Transparent-black surface sized to `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self::filled(canvas, Rgba::TRANSPARENT)
    }

    /// Surface with every pixel set to `color`.
    pub fn filled(canvas: Canvas, color: Rgba) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            pixels: vec![color; canvas.pixel_count()],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Pixel at column `x`, row `y` (row 0 is the top).
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Normalized coordinate of the center of pixel `(x, y)`.
    pub(crate) fn pixel_center(width: u32, height: u32, x: u32, y: u32) -> (f32, f32) {
        (
            (x as f32 + 0.5) / width as f32,
            1.0 - (y as f32 + 0.5) / height as f32,
        )
    }

    /// Bilinear sample at normalized `(u, v)` with repeat wrapping.
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let u = if u.is_finite() { fract(u) } else { 0.0 };
        let v = if v.is_finite() { fract(v) } else { 0.0 };

        let w = self.width as usize;
        let h = self.height as usize;
        let fx = u * self.width as f32 - 0.5;
        let fy = (1.0 - v) * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let wrap = |i: f32, n: usize| -> usize { (i as i64).rem_euclid(n as i64) as usize };
        let (xa, xb) = (wrap(x0, w), wrap(x0 + 1.0, w));
        let (ya, yb) = (wrap(y0, h), wrap(y0 + 1.0, h));
        let at = |x: usize, y: usize| self.pixels[y * w + x];

        let top = lerp(at(xa, ya), at(xb, ya), tx);
        let bottom = lerp(at(xa, yb), at(xb, yb), tx);
        lerp(top, bottom, ty)
    }
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    if t == 0.0 {
        return a;
    }
    a.zip(b, |x, y| x + (y - x) * t)
}
