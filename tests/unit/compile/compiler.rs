use super::*;
use crate::foundation::core::{Canvas, Rgba, TickIndex};
use crate::graph::node::{osc, shape, solid, src};
use crate::ops::generators;
use crate::param::resolver::Resolver;
use crate::render::buffers::BufferRegistry;

fn registry() -> BufferRegistry {
    let mut r = BufferRegistry::new(Canvas::new(2, 2).unwrap());
    r.register("a");
    r
}

fn eval_at(root: &Node, st: (f32, f32), time: f64) -> Rgba {
    let kernel = compile_kernel(root).unwrap();
    let params = Resolver::new(time, TickIndex(0))
        .resolve(root, &registry())
        .unwrap();
    let mut regs = kernel.registers();
    kernel.eval(&mut regs, st, time as f32, &params.values, &params.textures)
}

#[test]
fn generator_lowers_to_single_instruction() {
    let k = compile_kernel(&osc(10)).unwrap();
    assert_eq!(k.instruction_count(), 1);
    assert_eq!(k.param_count(), 3);
    assert_eq!(k.texture_count(), 0);
    assert!(matches!(k.instrs[0], Instr::Gen { params: 0, coord: 0, dst: 0, .. }));
}

#[test]
fn layout_matches_resolver() {
    let tree = osc(1).modulate(src("a"), 0.2).add(&shape(3).invert(()), 0.5).rotate(1);
    let k = compile_kernel(&tree).unwrap();
    let params = Resolver::new(0.0, TickIndex(0)).resolve(&tree, &registry()).unwrap();
    assert_eq!(k.param_count(), params.values.len());
    assert_eq!(k.texture_count(), params.textures.len());
}

#[test]
fn modulate_evaluates_texture_before_receiver() {
    let k = compile_kernel(&osc(()).modulate(src("a"), ())).unwrap();
    assert!(matches!(k.instrs[0], Instr::Sample { texture: 0, .. }));
    assert!(matches!(k.instrs[1], Instr::ModCoord { params: 0, coord: 0, dst: 1, .. }));
    // modulate(amount) occupies slot 0, osc follows it.
    assert!(matches!(k.instrs[2], Instr::Gen { params: 1, coord: 1, .. }));
}

#[test]
fn combine_reads_second_input_offsets_past_receiver_subtree() {
    let tree = osc(1).rotate(0.5).add(&shape(4), 1);
    let k = compile_kernel(&tree).unwrap();
    // add(1) | rotate(2) | osc(3) | shape(3)
    let gen_bases: Vec<u32> = k
        .instrs
        .iter()
        .filter_map(|i| match i {
            Instr::Gen { params, .. } => Some(*params),
            _ => None,
        })
        .collect();
    assert_eq!(gen_bases, vec![3, 6]);
}

#[test]
fn kernel_matches_direct_evaluation() {
    let st = (0.3, 0.7);
    let direct = generators::generate(GeneratorOp::Osc, &[20.0, 0.1, 0.0], st, 1.25);
    assert_eq!(eval_at(&osc(20), st, 1.25), direct);
}

#[test]
fn color_ops_apply_in_chain_order() {
    let c = eval_at(&solid((0.2, 0.4, 0.6, 1)).invert(()), (0.5, 0.5), 0.0);
    assert!((c.r - 0.8).abs() < 1e-6);
    assert!((c.g - 0.6).abs() < 1e-6);
    assert!((c.b - 0.4).abs() < 1e-6);
}

#[test]
fn invalid_tree_does_not_compile() {
    let err = compile_kernel(&solid((1, 1))).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn disassembly_has_one_line_per_instruction() {
    let k = compile_kernel(&osc(()).modulate(src("a"), ())).unwrap();
    let lines = disassemble(&k);
    assert_eq!(lines.len(), k.instruction_count());
    assert_eq!(lines[0], "k0 = src(t0, c0)");
    assert!(lines[1].starts_with("c1 = modulate(c0, k0)"));
}
