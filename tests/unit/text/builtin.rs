use super::*;

#[test]
fn scale_tracks_requested_size() {
    assert_eq!(BuiltinFont::new(4).scale(), 1);
    assert_eq!(BuiltinFont::new(32).scale(), 4);
    assert_eq!(BuiltinFont::new(57).scale(), 7);
}

#[test]
fn measure_is_monospace() {
    let mut f = BuiltinFont::new(16);
    let a = f.measure("ab");
    let b = f.measure("WW");
    assert_eq!(a, b);
    assert_eq!(a.width, 2 * 6 * 2);
    assert_eq!(a.height, 16);
    assert_eq!(f.measure("").width, 0);
    assert_eq!(f.line_height(), 16);
}

#[test]
fn draw_sets_only_glyph_pixels_and_clips() {
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let mut buf = vec![0u8; canvas.rgba_len()];
    let f = BuiltinFont::new(8);
    // `|` is a single full-height column at glyph column 2.
    f.draw(&mut buf, canvas, "|", 0, 0, [9, 9, 9, 255]);
    let px = |x: usize, y: usize| &buf[(y * 8 + x) * 4..(y * 8 + x) * 4 + 4];
    assert_eq!(px(2, 0), &[9, 9, 9, 255]);
    assert_eq!(px(2, 6), &[9, 9, 9, 255]);
    assert_eq!(px(2, 7), &[0, 0, 0, 0]);
    assert_eq!(px(0, 0), &[0, 0, 0, 0]);

    // Entirely off-canvas draws must not panic.
    f.draw(&mut buf, canvas, "hello", -100, -100, [1, 1, 1, 255]);
    f.draw(&mut buf, canvas, "hello", 100, 100, [1, 1, 1, 255]);
}

#[test]
fn unknown_characters_fall_back_to_question_mark() {
    assert_eq!(glyph_for('é'), glyph_for('?'));
    assert_eq!(glyph_for('\t'), glyph_for('?'));
    assert_ne!(glyph_for('A'), glyph_for('?'));
}
