use super::*;

#[test]
fn stanzas_split_on_blank_lines() {
    let text = "one\ntwo\n\n\nthree\n   \nfour\nfive\n";
    assert_eq!(
        parse_stanzas(text),
        vec!["one\ntwo".to_string(), "three".to_string(), "four\nfive".to_string()]
    );
}

#[test]
fn stanza_headings_are_removed() {
    let text = "Stanza 1:\nThe sea\n\nSTANZA 2 - the sky\n\nstanza 3\nthe shore";
    assert_eq!(
        parse_stanzas(text),
        vec![
            "The sea".to_string(),
            "the sky".to_string(),
            "the shore".to_string()
        ]
    );
}

#[test]
fn words_starting_with_stanza_are_kept() {
    assert_eq!(strip_heading("Stanzas of light"), "Stanzas of light");
    assert_eq!(strip_heading("Stanza one"), "Stanza one");
    assert_eq!(strip_heading("Stan"), "Stan");
}

#[test]
fn empty_and_heading_only_blocks_are_skipped() {
    assert!(parse_stanzas("").is_empty());
    assert!(parse_stanzas("\n\n  \n").is_empty());
    assert_eq!(parse_stanzas("Stanza 1:\n\nreal"), vec!["real".to_string()]);
}

#[test]
fn crlf_files_parse_like_lf() {
    let text = "a\r\nb\r\n\r\nc\r\n";
    assert_eq!(parse_stanzas(text), vec!["a\nb".to_string(), "c".to_string()]);
}

#[test]
fn stanza_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stanzas.txt");
    std::fs::write(&path, "Stanza 1:\nhello\n\nStanza 2:\nworld\n").unwrap();
    assert_eq!(
        read_stanza_file(&path).unwrap(),
        vec!["hello".to_string(), "world".to_string()]
    );
    assert!(matches!(
        read_stanza_file(&dir.path().join("none.txt")),
        Err(ReelError::ResourceNotFound { .. })
    ));
}

#[test]
fn backgrounds_are_filtered_sorted_and_cycled() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.PNG", "a.jpg", "notes.txt", "c.gif"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("d.png")).unwrap();

    let listed = list_backgrounds(dir.path()).unwrap();
    let names: Vec<_> = listed
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.jpg", "b.PNG", "c.gif"]);

    let picked = select_backgrounds(dir.path(), 5).unwrap();
    assert_eq!(picked.len(), 5);
    assert_eq!(picked[3], listed[0]);
    assert_eq!(picked[4], listed[1]);

    assert_eq!(select_backgrounds(dir.path(), 2).unwrap(), listed[..2].to_vec());
}

#[test]
fn empty_background_dir_is_resource_not_found() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        select_backgrounds(dir.path(), 1),
        Err(ReelError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        list_backgrounds(&dir.path().join("missing")),
        Err(ReelError::ResourceNotFound { .. })
    ));
}
