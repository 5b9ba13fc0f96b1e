use super::*;

#[test]
fn missing_candidates_fall_back_to_builtin() {
    let mut font = resolve_font_from(
        [PathBuf::from("/definitely/not/here/font.ttf")],
        40,
    );
    assert!(font.is_builtin());
    assert_eq!(font.size_px(), 40);
    assert!(font.measure("abc").width > 0);
    assert!(font.describe().contains("built-in"));
}

#[test]
fn non_font_bytes_are_rejected_and_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("not-a-font.ttf");
    std::fs::write(&bogus, b"this is not a font file").unwrap();

    let font = resolve_font_from([bogus], 32);
    assert!(font.is_builtin());
}

#[test]
fn empty_candidate_list_falls_back() {
    let font = resolve_font_from(Vec::<PathBuf>::new(), 48);
    assert!(font.is_builtin());
}

#[test]
fn configured_path_failure_never_panics() {
    let mut font = resolve_font(Some(Path::new("/nope/Arial.ttf")), 48);
    assert_eq!(font.size_px(), 48);
    assert!(font.line_height() > 0);
}

#[test]
fn system_candidates_include_dejavu() {
    assert!(!SYSTEM_FONT_CANDIDATES.is_empty());
    assert!(
        SYSTEM_FONT_CANDIDATES
            .iter()
            .any(|p| p.ends_with("DejaVuSans.ttf"))
    );
}
