use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        ReelError::font_exhausted("x")
            .to_string()
            .contains("font resolution exhausted:")
    );
    assert!(
        ReelError::encoding("x")
            .to_string()
            .contains("encoding failed:")
    );
}

#[test]
fn resource_not_found_names_what_and_path() {
    let err = ReelError::resource_not_found("audio for stanza 2", "/tmp/missing.wav");
    let msg = err.to_string();
    assert!(msg.contains("audio for stanza 2"));
    assert!(msg.contains("/tmp/missing.wav"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn into_encoding_keeps_input_errors_and_retags_the_rest() {
    let kept = ReelError::invalid_input("bad fps").into_encoding();
    assert!(matches!(kept, ReelError::InvalidInput(_)));

    let io = ReelError::Other(anyhow::anyhow!("pipe closed")).into_encoding();
    let ReelError::EncodingFailed(msg) = io else {
        panic!("expected EncodingFailed");
    };
    assert!(msg.contains("pipe closed"));
}

#[test]
fn for_stanza_keeps_kind_and_adds_number() {
    let err = ReelError::invalid_input("text is empty").for_stanza(3);
    let ReelError::InvalidInput(msg) = &err else {
        panic!("expected InvalidInput");
    };
    assert_eq!(msg, "stanza 3: text is empty");

    let wrapped = ReelError::Other(anyhow::anyhow!("decode failed")).for_stanza(2);
    let ReelError::Other(e) = &wrapped else {
        panic!("expected Other");
    };
    assert_eq!(e.to_string(), "stanza 2");
    assert!(format!("{e:#}").contains("decode failed"));

    let missing = ReelError::resource_not_found("audio for stanza 1", "/x.wav").for_stanza(1);
    assert!(matches!(missing, ReelError::ResourceNotFound { .. }));
}
