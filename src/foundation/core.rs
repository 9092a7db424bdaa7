use crate::foundation::error::{LoopwaveError, LoopwaveResult};

/// Zero-based index of a scheduler tick.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TickIndex(pub u64);

impl TickIndex {
    /// The tick that follows `self`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Display refresh rate as a rational number of ticks per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated rate.
    pub fn new(num: u32, den: u32) -> LoopwaveResult<Self> {
        if den == 0 {
            return Err(LoopwaveError::configuration("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LoopwaveError::configuration("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Ticks per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of a single tick in seconds.
    pub fn tick_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Seconds elapsed after `ticks` ticks.
    pub fn ticks_to_secs(self, ticks: u64) -> f64 {
        (ticks as f64) * self.tick_duration_secs()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Resolution shared by every buffer of a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a validated canvas.
    pub fn new(width: u32, height: u32) -> LoopwaveResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    /// Reject zero-sized canvases.
    pub fn validate(self) -> LoopwaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LoopwaveError::configuration(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

/// Straight-alpha RGBA color with `f32` channels, nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black; the initial content of every buffer.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Construct from channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray level.
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v, 1.0)
    }

    /// Apply `f` to every channel.
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), f(self.a))
    }

    /// Channel-wise combination of two colors.
    pub fn zip(self, o: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.r, o.r), f(self.g, o.g), f(self.b, o.b), f(self.a, o.a))
    }

    /// Clamp every channel into `[0, 1]`; NaN becomes 0.
    pub fn saturated(self) -> Self {
        self.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) })
    }

    /// Quantize to straight RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn q(c: f32) -> u8 {
            (c * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
        }
        let c = self.saturated();
        [q(c.r), q(c.g), q(c.b), q(c.a)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
