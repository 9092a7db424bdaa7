use super::*;
use crate::graph::node::{noise, osc, shape, solid, src};

fn canvas() -> Canvas {
    Canvas::new(8, 8).unwrap()
}

#[test]
fn buffers_are_collected_in_first_mention_order() {
    let patch = Patch::builder(canvas())
        .graph(osc(10).modulate("a", 0.1).out_primary())
        .graph(shape((4, 0.5, 0)).out("a"))
        .build()
        .unwrap();
    assert_eq!(
        patch.buffers(),
        &["primary".to_owned(), "a".to_owned()][..]
    );
    assert_eq!(patch.present(), PRIMARY);
    assert_eq!(patch.graphs().len(), 2);
}

#[test]
fn later_graph_on_same_target_replaces_earlier() {
    let patch = Patch::builder(canvas())
        .graph(osc(10).out_primary())
        .graph(noise(()).out_primary())
        .build()
        .unwrap();
    assert_eq!(patch.graphs().len(), 1);
    assert_eq!(patch.graphs()[0].root().op().name(), "noise");
}

#[test]
fn missing_required_parameter_fails_build() {
    let err = Patch::builder(canvas())
        .graph(solid((1, 1)).out_primary())
        .build()
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("graph 'primary'"));
}

#[test]
fn declared_buffers_reject_unknown_names() {
    let err = Patch::builder(canvas())
        .buffers(["primary", "o1"])
        .graph(src("o2").out_primary())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("unregistered buffer 'o2'"));

    let ok = Patch::builder(canvas())
        .buffers(["primary", "o1", "o2"])
        .graph(src("o2").out_primary())
        .build()
        .unwrap();
    assert_eq!(ok.buffers().len(), 3);
}

#[test]
fn presented_buffer_must_be_written() {
    let err = Patch::builder(canvas())
        .graph(osc(()).out("o0"))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("presented buffer 'primary'"));

    let ok = Patch::builder(canvas())
        .graph(osc(()).out("o0"))
        .render("o0")
        .build();
    assert!(ok.is_ok());
}

#[test]
fn empty_patch_is_rejected() {
    assert!(Patch::builder(canvas()).build().is_err());
}
