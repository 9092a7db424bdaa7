use super::*;

#[test]
fn parse_accepts_patch_file_prefix() {
    let e = TimeExpr::parse("=(sin(time)+1.5)*0.05").unwrap();
    assert_eq!(e.source(), "=(sin(time)+1.5)*0.05");
    let v = e.eval(0.0).unwrap();
    assert!((v - 0.075).abs() < 1e-12);
}

#[test]
fn parse_errors_are_configuration_errors() {
    let err = TimeExpr::parse("sin(").unwrap_err();
    assert!(err.is_configuration());
    let err = TimeExpr::parse("bpm * 2").unwrap_err();
    assert!(err.to_string().contains("unknown identifier"));
}

#[test]
fn bool_result_is_a_time_fn_error() {
    let e = TimeExpr::parse("time > 1").unwrap();
    assert!(e.eval(2.0).is_err());
}

#[test]
fn eval_tracks_time() {
    let e = TimeExpr::parse("fract(time * 0.5)").unwrap();
    assert!((e.eval(3.0).unwrap() - 0.5).abs() < 1e-12);
    assert!((e.eval(0.5).unwrap() - 0.25).abs() < 1e-12);
}
