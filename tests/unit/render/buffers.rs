use super::*;
use crate::foundation::core::Rgba;

fn registry() -> BufferRegistry {
    let mut r = BufferRegistry::new(Canvas::new(4, 3).unwrap());
    r.register("a");
    r
}

fn fill(s: &mut Surface, c: Rgba) {
    s.pixels_mut().fill(c);
}

#[test]
fn register_is_idempotent() {
    let mut r = registry();
    assert!(!r.register("a"));
    assert!(r.register("b"));
    assert_eq!(r.names(), &["a".to_owned(), "b".to_owned()][..]);
}

#[test]
fn new_buffers_start_transparent() {
    let r = registry();
    let front = r.front("a").unwrap();
    assert!(front.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    assert_eq!(front.width(), 4);
    assert_eq!(front.height(), 3);
}

#[test]
fn unknown_name_is_configuration_error() {
    let mut r = registry();
    assert!(r.front("nope").unwrap_err().is_configuration());
    assert!(r.swap("nope").unwrap_err().is_configuration());
    assert!(r.write("nope", |_| ()).unwrap_err().is_configuration());
}

#[test]
fn writes_are_invisible_until_swap() {
    let mut r = registry();
    r.write("a", |s| fill(s, Rgba::gray(1.0))).unwrap();
    assert!(r.is_pending("a").unwrap());
    assert_eq!(r.front("a").unwrap().get(0, 0), Some(Rgba::TRANSPARENT));

    assert!(r.swap("a").unwrap());
    assert_eq!(r.front("a").unwrap().get(0, 0), Some(Rgba::gray(1.0)));
    assert!(!r.is_pending("a").unwrap());
}

#[test]
fn swap_without_pending_write_is_noop() {
    let mut r = registry();
    r.write("a", |s| fill(s, Rgba::gray(0.5))).unwrap();
    r.swap("a").unwrap();
    let before = r.front("a").unwrap();

    assert!(!r.swap("a").unwrap());
    let after = r.front("a").unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn held_front_survives_swap() {
    let mut r = registry();
    let held = r.front("a").unwrap();
    r.write("a", |s| fill(s, Rgba::gray(1.0))).unwrap();
    r.swap("a").unwrap();
    assert_eq!(held.get(0, 0), Some(Rgba::TRANSPARENT));

    r.write("a", |s| fill(s, Rgba::gray(0.25))).unwrap();
    r.swap("a").unwrap();
    assert_eq!(r.front("a").unwrap().get(1, 1), Some(Rgba::gray(0.25)));
}

#[test]
fn double_checkout_is_rejected() {
    let mut r = registry();
    let back = r.checkout("a").unwrap();
    assert!(r.checkout("a").is_err());
    r.commit("a", back).unwrap();
    assert!(r.swap("a").unwrap());
}

#[test]
fn commit_checks_size() {
    let mut r = registry();
    let _ = r.checkout("a").unwrap();
    let wrong = Surface::new(Canvas::new(2, 2).unwrap());
    assert!(r.commit("a", wrong).is_err());
}

#[test]
fn restored_back_side_is_not_pending() {
    let mut r = registry();
    let back = r.checkout("a").unwrap();
    r.restore("a", back).unwrap();
    assert!(!r.is_pending("a").unwrap());
    assert!(!r.swap("a").unwrap());
}
