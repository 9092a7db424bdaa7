use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LoopwaveError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        LoopwaveError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        LoopwaveError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LoopwaveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_configuration());
}
