use super::*;
use crate::param::slot::{buffer, time};

#[test]
fn combinators_do_not_mutate_receiver() {
    let base = osc((10, 0.1));
    let rotated = base.rotate(1.0);
    assert_eq!(base.op().name(), "osc");
    assert_eq!(base.params().len(), 2);
    assert_eq!(rotated.op().name(), "rotate");
    assert_eq!(rotated.inputs()[0].params().len(), 2);
}

#[test]
fn string_texture_argument_becomes_src_node() {
    let n = osc(10).modulate("a", 0.1);
    let other = &n.inputs()[1];
    assert_eq!(other.op().name(), "src");
    assert_eq!(n.buffer_refs(), vec![&buffer("a")]);
}

#[test]
fn display_reads_like_chain_source() {
    let n = shape((50, 0.4, 0.2)).invert(1).mult(&osc(23), ());
    assert_eq!(n.to_string(), "shape(50, 0.4, 0.2).invert(1).mult(osc(23))");
    let n = osc(time(|t| t)).modulate(buffer("o1").with_strength(0.5), 0.05);
    assert_eq!(n.to_string(), "osc(() => ..).modulate(src(o1*0.5), 0.05)");
}

#[test]
fn solid_missing_required_argument_fails_validation() {
    let err = solid((1, 1)).validate().unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("missing required argument(s): b"));
    assert!(solid((1, 1, 1)).validate().is_ok());
}

#[test]
fn too_many_arguments_fail_validation() {
    let err = noise(()).kaleid((4, 5)).validate().unwrap_err();
    assert!(err.to_string().contains("at most 1"));
}

#[test]
fn arity_mismatch_is_reported() {
    let bad = Node::Transform {
        op: TransformOp::Combine(CombineOp::Add),
        params: Vec::new(),
        inputs: vec![osc(())],
    };
    let err = bad.validate().unwrap_err();
    assert!(err.to_string().contains("arity mismatch"));

    let err = Node::new(OpKind::from_name("osc").unwrap(), Vec::new(), vec![noise(())]);
    assert!(err.unwrap_err().is_configuration());
}

#[test]
fn buffer_slot_in_number_position_is_malformed() {
    let err = osc(buffer("a")).validate().unwrap_err();
    assert!(err.to_string().contains("malformed argument 'frequency'"));
    let err = osc(f64::NAN).validate().unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn nested_errors_are_found() {
    let tree = osc(()).add(&solid(1), 0.5).rotate(());
    assert!(tree.validate().is_err());
}
