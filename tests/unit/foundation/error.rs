use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TickdownError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TickdownError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        TickdownError::capture_unavailable("x")
            .to_string()
            .contains("capture unavailable:")
    );
    assert!(
        TickdownError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        TickdownError::service("x")
            .to_string()
            .contains("service error:")
    );
    assert!(
        TickdownError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TickdownError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
