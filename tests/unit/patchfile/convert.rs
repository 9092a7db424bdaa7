use serde_json::json;

use super::*;

fn patch(v: serde_json::Value) -> LoopwaveResult<Patch> {
    let def: PatchDef = serde_json::from_value(v).map_err(|e| LoopwaveError::serde(e.to_string()))?;
    to_patch(&def)
}

#[test]
fn feedback_patch_converts() {
    let p = patch(json!({
        "canvas": {"width": 8, "height": 8},
        "fps": {"num": 30},
        "outputs": [
            {"buffer": "a", "chain": [{"op": "shape", "args": [4, 0.5, 0]}]},
            {"chain": [
                {"op": "osc", "args": [10]},
                {"op": "modulate", "args": ["a", 0.1]}
            ]}
        ]
    }))
    .unwrap();
    assert_eq!(p.graphs().len(), 2);
    assert_eq!(p.graphs()[1].target(), PRIMARY);
    assert_eq!(p.graphs()[1].root().to_string(), "osc(10).modulate(src(a), 0.1)");
    assert_eq!(p.buffers(), &["a".to_owned(), PRIMARY.to_owned()][..]);
    assert_eq!(p.fps(), Fps::new(30, 1).unwrap());
}

#[test]
fn nested_chains_and_expressions_convert() {
    let p = patch(json!({
        "canvas": {"width": 4, "height": 4},
        "outputs": [{"chain": [
            {"op": "osc", "args": [20, "=sin(time) * 0.1"]},
            {"op": "mult", "args": [{"chain": [{"op": "shape", "args": [3]}, {"op": "invert"}]}]}
        ]}]
    }))
    .unwrap();
    let root = p.graphs()[0].root();
    assert_eq!(root.op().name(), "mult");
    assert_eq!(root.inputs()[1].op().name(), "invert");
    assert!(matches!(root.inputs()[0].params()[1], ParamSlot::Time(_)));
}

#[test]
fn src_generator_takes_buffer_object() {
    let p = patch(json!({
        "canvas": {"width": 4, "height": 4},
        "buffers": ["o0", "o1"],
        "render": "o0",
        "outputs": [
            {"buffer": "o1", "chain": [{"op": "noise"}]},
            {"buffer": "o0", "chain": [{"op": "src", "args": [{"buffer": "o1", "strength": 0.5}]}]}
        ]
    }))
    .unwrap();
    assert_eq!(p.present(), "o0");
    let ParamSlot::Buffer(b) = &p.graphs()[1].root().params()[0] else {
        panic!("expected buffer slot");
    };
    assert_eq!(b.strength, 0.5);
}

#[test]
fn unknown_operator_is_configuration_error() {
    let err = patch(json!({
        "canvas": {"width": 4, "height": 4},
        "outputs": [{"chain": [{"op": "wobble"}]}]
    }))
    .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("outputs[0]"));
}

#[test]
fn chain_must_start_with_generator() {
    let err = patch(json!({
        "canvas": {"width": 4, "height": 4},
        "outputs": [{"chain": [{"op": "rotate"}]}]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("must start with a generator"));
}

#[test]
fn missing_second_input_is_arity_mismatch() {
    let err = patch(json!({
        "canvas": {"width": 4, "height": 4},
        "outputs": [{"chain": [{"op": "osc"}, {"op": "add"}]}]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("arity mismatch"));
}

#[test]
fn bad_expression_is_configuration_error() {
    let err = patch(json!({
        "canvas": {"width": 4, "height": 4},
        "outputs": [{"chain": [{"op": "osc", "args": ["=sin(time"]}]}]
    }))
    .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn undeclared_buffer_is_rejected() {
    let err = patch(json!({
        "canvas": {"width": 4, "height": 4},
        "buffers": ["primary"],
        "outputs": [{"chain": [{"op": "osc"}, {"op": "modulate", "args": ["ghost"]}]}]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("unregistered buffer 'ghost'"));
}
