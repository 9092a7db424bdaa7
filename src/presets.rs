//! Built-in patches.

use crate::foundation::core::Canvas;
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::graph::node::{Node, noise, osc, shape, solid, voronoi};
use crate::graph::patch::Patch;
use crate::param::slot::{ParamSlot, time};

/// Names accepted by [`preset`].
pub const PRESET_NAMES: &[&str] = &["cell", "cell-original"];

/// Look up a built-in patch by name.
pub fn preset(name: &str, canvas: Canvas) -> LoopwaveResult<Patch> {
    match name {
        "cell" => cell(canvas),
        "cell-original" => cell_original(canvas),
        other => Err(LoopwaveError::configuration(format!(
            "unknown preset '{other}' (expected one of: {})",
            PRESET_NAMES.join(", ")
        ))),
    }
}

fn pulsing_smoothing() -> ParamSlot {
    time(|t| (t.sin() + 1.5) * 0.05)
}

fn breathing_radius() -> ParamSlot {
    time(|t| ((t * 0.5).sin() + 1.0) * 0.12)
}

fn kaleid_osc() -> Node {
    osc((23, -0.05, 1000))
        .brightness(0.3)
        .saturate(0.6)
        .kaleid(50)
}

fn feedback_noise() -> Node {
    noise((5, 0.1)).add(solid((1, 1, 1)), 0.5).rotate((1, -0.05))
}

/// A cell membrane over its own rotating noise feedback.
///
/// Two graphs: `primary` (presented) samples `o1` three times; `o1` is noise over white.
pub fn cell(canvas: Canvas) -> LoopwaveResult<Patch> {
    let membrane = shape((50, 0.4, pulsing_smoothing()))
        .sub(
            shape((50, breathing_radius(), 0.2)).modulate_scale("o1", 0.5),
            (),
        )
        .add(voronoi((60, 1, 5)).mult(shape((50, 0.4, 0.2)).invert(1), ()), ())
        .mult(kaleid_osc(), ())
        .modulate_scale("o1", 0.2)
        .rotate((1, 0.1))
        .modulate("o1", 0.05)
        .scale((1, 1, 1.5));

    Patch::builder(canvas)
        .graph(membrane.out_primary())
        .graph(feedback_noise().out("o1"))
        .build()
}

/// Four-buffer variant presenting `o0`, with textured `o2` and a voronoi cell field in `o3`.
pub fn cell_original(canvas: Canvas) -> LoopwaveResult<Patch> {
    let o0 = shape((50, 0.4, pulsing_smoothing()))
        .sub(
            shape((50, breathing_radius(), 0.2)).modulate_scale("o1", 0.5),
            (),
        )
        .add("o3", ())
        .mult(kaleid_osc(), ())
        .modulate_scale("o1", 0.2)
        .rotate((1, 0.1))
        .modulate_scale("o2", 0.1)
        .modulate("o1", 0.05)
        .scale((1, 1, 1.5));
    let o2 = noise((500, 1))
        .contrast(0.8)
        .brightness(0.3)
        .sub(shape((50, 0.4, 0.2)).invert(1), ());
    let o3 = voronoi((60, 1, 5)).mult(shape((50, 0.35, 0.1)), ());

    Patch::builder(canvas)
        .buffers(["o0", "o1", "o2", "o3"])
        .render("o0")
        .graph(o0.out("o0"))
        .graph(feedback_noise().out("o1"))
        .graph(o2.out("o2"))
        .graph(o3.out("o3"))
        .build()
}
