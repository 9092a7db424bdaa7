use rayon::prelude::*;

use crate::compile::kernel::{CompiledKernel, Registers};
use crate::foundation::core::Rgba;
use crate::foundation::error::{LoopwaveError, LoopwaveResult};
use crate::param::resolver::ResolvedParams;
use crate::render::surface::Surface;

/// Evaluate `kernel` at every pixel center of `target`, clamping each result to `[0, 1]`.
///
/// With a pool, rows are distributed across its workers; every row owns its register file.
/// Results are identical either way.
pub(crate) fn execute(
    kernel: &CompiledKernel,
    params: &ResolvedParams,
    time: f64,
    target: &mut Surface,
    pool: Option<&rayon::ThreadPool>,
) -> LoopwaveResult<()> {
    if params.values.len() != kernel.param_count() || params.textures.len() != kernel.texture_count()
    {
        return Err(LoopwaveError::evaluation(format!(
            "kernel {} expects {} params and {} textures, got {} and {}",
            kernel.signature(),
            kernel.param_count(),
            kernel.texture_count(),
            params.values.len(),
            params.textures.len()
        )));
    }

    let (w, h) = (target.width(), target.height());
    let time = time as f32;
    let row = |regs: &mut Registers, (y, pixels): (usize, &mut [Rgba])| {
        for (x, px) in pixels.iter_mut().enumerate() {
            let st = Surface::pixel_center(w, h, x as u32, y as u32);
            *px = kernel
                .eval(regs, st, time, &params.values, &params.textures)
                .saturated();
        }
    };

    let rows = target.pixels_mut();
    match pool {
        Some(pool) => pool.install(|| {
            rows.par_chunks_mut(w as usize)
                .enumerate()
                .for_each_init(|| kernel.registers(), row);
        }),
        None => {
            let mut regs = kernel.registers();
            for item in rows.chunks_mut(w as usize).enumerate() {
                row(&mut regs, item);
            }
        }
    }
    Ok(())
}

/// Build the worker pool used for row-parallel evaluation.
pub(crate) fn build_thread_pool(threads: Option<usize>) -> LoopwaveResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LoopwaveError::configuration(
            "scheduler 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LoopwaveError::evaluation(format!("failed to build rayon thread pool: {e}")))
}
