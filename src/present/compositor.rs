use crate::foundation::core::Rgba;
use crate::present::sink::FrameRGBA;
use crate::render::surface::Surface;

/// Quantize `surface` into a straight-alpha RGBA8 frame.
///
/// With a `background`, every pixel is composited over it and the result is opaque.
pub fn present(surface: &Surface, background: Option<Rgba>) -> FrameRGBA {
    let mut data = Vec::with_capacity(surface.pixels().len() * 4);
    for px in surface.pixels() {
        let c = match background {
            Some(bg) => over(px.saturated(), bg.saturated()),
            None => *px,
        };
        data.extend_from_slice(&c.to_rgba8());
    }
    FrameRGBA {
        width: surface.width(),
        height: surface.height(),
        data,
        premultiplied: false,
    }
}

fn over(fg: Rgba, bg: Rgba) -> Rgba {
    let a = fg.a;
    Rgba::new(
        fg.r * a + bg.r * (1.0 - a),
        fg.g * a + bg.g * (1.0 - a),
        fg.b * a + bg.b * (1.0 - a),
        1.0,
    )
}
