use super::*;

#[test]
fn names_round_trip_through_lookup() {
    for op in ALL_OPS {
        assert_eq!(OpKind::from_name(op.name()).unwrap(), op);
    }
}

#[test]
fn codes_are_unique_and_ordered() {
    for (i, op) in ALL_OPS.iter().enumerate() {
        assert_eq!(usize::from(op.code()), i);
    }
}

#[test]
fn unknown_name_is_configuration_error() {
    let err = OpKind::from_name("feedbackBlur").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("feedbackBlur"));
}

#[test]
fn lookup_is_case_sensitive() {
    assert!(OpKind::from_name("modulatescale").is_err());
    assert!(OpKind::from_name("modulateScale").is_ok());
}

#[test]
fn required_params_and_arity() {
    let solid = OpKind::from_name("solid").unwrap();
    assert_eq!(solid.required_params(), 3);
    assert_eq!(solid.input_arity(), 0);

    let src = OpKind::from_name("src").unwrap();
    assert_eq!(src.required_params(), 1);
    assert_eq!(src.params()[0].kind, ParamKind::Buffer);

    let add = OpKind::from_name("add").unwrap();
    assert_eq!(add.required_params(), 0);
    assert_eq!(add.input_arity(), 2);

    assert_eq!(OpKind::from_name("kaleid").unwrap().input_arity(), 1);
}

#[test]
fn defaults_follow_library_table() {
    let osc = OpKind::from_name("osc").unwrap();
    let defaults: Vec<_> = osc.params().iter().map(|p| p.default).collect();
    assert_eq!(defaults, vec![Some(60.0), Some(0.1), Some(0.0)]);
    assert_eq!(osc.params()[0].fallback(), 60.0);
    assert_eq!(OpKind::from_name("solid").unwrap().params()[0].fallback(), 0.0);
}
