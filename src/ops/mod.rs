//! Per-pixel operator formulas.
//!
//! Coordinates are normalized to `[0, 1]` with y pointing up; colors are straight-alpha `f32`.

pub(crate) mod colors;
pub(crate) mod combine;
pub(crate) mod coords;
pub(crate) mod generators;
pub(crate) mod modulate;
pub(crate) mod noise;
