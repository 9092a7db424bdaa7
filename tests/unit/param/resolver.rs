use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::foundation::core::Canvas;
use crate::graph::node::{osc, shape, solid, src};
use crate::param::slot::{buffer, time};

fn buffers() -> BufferRegistry {
    let mut r = BufferRegistry::new(Canvas::new(2, 2).unwrap());
    r.register("a");
    r
}

#[test]
fn omitted_trailing_params_take_defaults() {
    let res = Resolver::new(0.0, TickIndex(0))
        .resolve(&osc(10), &buffers())
        .unwrap();
    assert_eq!(res.values, vec![10.0, 0.1, 0.0]);
    assert_eq!(res.substitutions, 0);
}

#[test]
fn values_follow_canonical_preorder() {
    let tree = osc(1).add(&shape(2), 0.5).rotate(3);
    let res = Resolver::new(0.0, TickIndex(0)).resolve(&tree, &buffers()).unwrap();
    // rotate(3, 0), add(0.5), osc(1, 0.1, 0), shape(2, 0.3, 0.01)
    assert_eq!(res.values.len(), 2 + 1 + 3 + 3);
    assert_eq!(res.values[0], 3.0);
    assert_eq!(res.values[2], 0.5);
    assert_eq!(res.values[3], 1.0);
    assert_eq!(res.values[6], 2.0);
}

#[test]
fn time_functions_see_shared_instant_once_each() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let f = time(move |t| {
        c.fetch_add(1, Ordering::SeqCst);
        t * 2.0
    });
    let tree = osc(f.clone()).add(&osc(f), ());
    let res = Resolver::new(1.5, TickIndex(3)).resolve(&tree, &buffers()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(res.values[1], 3.0);
    assert_eq!(res.values[4], 3.0);
}

#[test]
fn failing_time_function_substitutes_default() {
    let bad = ParamSlot::try_time(|_| Err(TimeFnError::new("boom")));
    let nan = time(|_| f64::NAN);
    let res = Resolver::new(0.0, TickIndex(0))
        .resolve(&shape((bad, nan)), &buffers())
        .unwrap();
    assert_eq!(res.values, vec![3.0, 0.3, 0.01]);
    assert_eq!(res.substitutions, 2);
}

#[test]
fn panicking_time_function_substitutes_default() {
    let res = Resolver::new(1.0, TickIndex(3))
        .resolve(&osc(time(|_| panic!("bad frame"))), &buffers())
        .unwrap();
    assert_eq!(res.values, vec![60.0, 0.1, 0.0]);
    assert_eq!(res.substitutions, 1);
}

#[test]
fn required_param_failure_falls_back_to_zero() {
    let bad = ParamSlot::try_time(|_| Err(TimeFnError::new("boom")));
    let res = Resolver::new(0.0, TickIndex(0))
        .resolve(&solid((bad, 1, 1)), &buffers())
        .unwrap();
    assert_eq!(res.values, vec![0.0, 1.0, 1.0, 1.0]);
}

#[test]
fn buffer_refs_bind_front_surfaces() {
    let reg = buffers();
    let res = Resolver::new(0.0, TickIndex(0))
        .resolve(&osc(()).modulate(buffer("a").with_strength(0.5), ()), &reg)
        .unwrap();
    assert_eq!(res.textures.len(), 1);
    assert_eq!(res.textures[0].buffer, "a");
    assert_eq!(res.textures[0].strength, 0.5);
    assert!(Arc::ptr_eq(&res.textures[0].surface, &reg.front("a").unwrap()));
}

#[test]
fn unregistered_buffer_is_configuration_error() {
    let err = Resolver::new(0.0, TickIndex(0))
        .resolve(&src("missing"), &buffers())
        .unwrap_err();
    assert!(err.is_configuration());
}
