use super::*;
use crate::config::settings::VerticalAnchor;
use crate::text::builtin::BuiltinFont;
use crate::text::measure::TextMeasurer;
use crate::text::outline::OutlineFont;

const FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/fonts/DejaVuSans.ttf");

fn outline_font(size_px: u32) -> CaptionFont {
    CaptionFont::Outline(Box::new(
        OutlineFont::load(std::path::Path::new(FONT), size_px).unwrap(),
    ))
}

fn small_canvas() -> Canvas {
    Canvas {
        width: 200,
        height: 100,
    }
}

fn builtin_layout(text: &str) -> (CaptionLayout, CaptionFont) {
    let mut font = CaptionFont::Builtin(BuiltinFont::new(16));
    let layout = CaptionLayoutEngine::new(180, small_canvas(), VerticalAnchor::Center)
        .layout(text, &mut font)
        .unwrap();
    (layout, font)
}

#[test]
fn builtin_render_draws_fill_over_stroke() {
    let (layout, mut font) = builtin_layout("HI");
    // 2 glyphs * 6 cols * scale 2 = 24 wide, 16 tall.
    assert_eq!(layout.lines[0].x, 88);
    assert_eq!(layout.lines[0].y, 42);

    let renderer = CaptionRenderer::new(small_canvas(), &CaptionStyle::default());
    let overlay = renderer.render(&layout, &mut font).unwrap();

    assert_eq!(overlay.width, 200);
    assert_eq!(overlay.height, 100);
    assert_eq!(overlay.data.len(), 200 * 100 * 4);

    // First column of 'H' is lit on every row.
    assert_eq!(overlay.pixel(88, 42), [255, 255, 255, 255]);
    // Two pixels to its left only the outline reaches.
    assert_eq!(overlay.pixel(86, 42), [0, 0, 0, 255]);
    assert_eq!(overlay.pixel(87, 50), [0, 0, 0, 255]);
    // Far corners stay transparent.
    assert_eq!(overlay.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(overlay.pixel(199, 99), [0, 0, 0, 0]);
}

#[test]
fn zero_stroke_leaves_no_outline() {
    let (layout, mut font) = builtin_layout("HI");
    let style = CaptionStyle {
        stroke_width: 0,
        ..CaptionStyle::default()
    };
    let overlay = CaptionRenderer::new(small_canvas(), &style)
        .render(&layout, &mut font)
        .unwrap();
    assert_eq!(overlay.pixel(86, 42), [0, 0, 0, 0]);
    assert!(
        overlay
            .data
            .chunks_exact(4)
            .all(|px| px[3] == 0 || px == [255, 255, 255, 255])
    );
}

#[test]
fn spacer_lines_draw_nothing() {
    let (layout, mut font) = builtin_layout("A\n\nB");
    assert!(layout.lines[1].is_spacer());
    let spacer = layout.lines[1].clone();

    let overlay = CaptionRenderer::new(small_canvas(), &CaptionStyle::default())
        .render(&layout, &mut font)
        .unwrap();

    // The middle of the spacer row is farther than the stroke radius from any glyph.
    let mid_y = (spacer.y + spacer.height as i32 / 2) as u32;
    for x in 0..overlay.width {
        assert_eq!(overlay.pixel(x, mid_y)[3], 0);
    }
}

#[test]
fn more_text_covers_more_pixels() {
    let (short_layout, mut f1) = builtin_layout("I");
    let (long_layout, mut f2) = builtin_layout("WWW WWW");
    let r = CaptionRenderer::new(small_canvas(), &CaptionStyle::default());
    let short = r.render(&short_layout, &mut f1).unwrap();
    let long = r.render(&long_layout, &mut f2).unwrap();
    assert!(long.covered_pixels() > short.covered_pixels());
    assert!(short.covered_pixels() > 0);
}

#[test]
fn render_caption_always_produces_pixels() {
    let style = CaptionStyle {
        font_path: Some("/definitely/not/a/font.ttf".into()),
        ..CaptionStyle::default()
    };
    let canvas = Canvas {
        width: 320,
        height: 240,
    };
    let overlay = render_caption("hello there", &style, canvas).unwrap();
    assert_eq!(overlay.canvas(), canvas);
    assert!(overlay.covered_pixels() > 0);
}

#[test]
fn render_caption_rejects_blank_text() {
    let err = render_caption("   ", &CaptionStyle::default(), small_canvas()).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}

#[test]
fn prepare_caption_uses_selected_size() {
    let (layout, font) = prepare_caption("short", &CaptionStyle::default(), small_canvas()).unwrap();
    assert_eq!(layout.font_size, 57);
    assert_eq!(crate::text::measure::TextMeasurer::size_px(&font), 57);
}

#[test]
fn outline_wrapping_respects_every_budget() {
    let text = "The river folds its silver arms around the sleeping town\n\
                and lanterns drift like patient moons across the water";
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    let mut font = outline_font(48);

    for budget in [200, 333, 500, 900] {
        let layout = CaptionLayoutEngine::new(budget, canvas, VerticalAnchor::Center)
            .layout(text, &mut font)
            .unwrap();
        assert!(layout.lines.len() >= 2);
        for line in &layout.lines {
            let measured = font.measure(&line.text).width;
            assert_eq!(measured, line.width, "{line:?}");
            assert!(
                measured <= budget || !line.text.contains(' '),
                "budget {budget}: {line:?}"
            );
        }
    }
}

#[test]
fn outline_fill_sits_over_its_stroke() {
    let canvas = Canvas {
        width: 240,
        height: 200,
    };
    let style = CaptionStyle {
        stroke_width: 3,
        ..CaptionStyle::default()
    };
    let mut font = outline_font(96);
    let layout = CaptionLayoutEngine::new(200, canvas, VerticalAnchor::Center)
        .layout("I", &mut font)
        .unwrap();
    let overlay = CaptionRenderer::new(canvas, &style)
        .render(&layout, &mut font)
        .unwrap();

    let line = &layout.lines[0];
    let mid = (line.y + line.height as i32 / 2) as u32;
    let white = (0..overlay.width)
        .find(|&x| overlay.pixel(x, mid) == [255, 255, 255, 255])
        .expect("no opaque fill inside the stem");

    // Inside the stem stroke copies overlap, yet the fill wins.
    assert_eq!(overlay.pixel(white + 1, mid), [255, 255, 255, 255]);
    // Just outside the stem only the outline reaches.
    let outside = overlay.pixel(white - 2, mid);
    assert_eq!(outside[3], 255, "{outside:?}");
    assert!(outside[..3].iter().all(|&c| c < 40), "{outside:?}");
    // Past the stroke radius nothing is drawn.
    assert_eq!(overlay.pixel(white - 6, mid)[3], 0);
}

#[test]
fn outline_ink_stays_within_line_boxes() {
    let canvas = Canvas {
        width: 400,
        height: 400,
    };
    let style = CaptionStyle {
        stroke_width: 2,
        ..CaptionStyle::default()
    };
    let mut font = outline_font(48);
    let layout = CaptionLayoutEngine::new(360, canvas, VerticalAnchor::Center)
        .layout("Hg\nWy", &mut font)
        .unwrap();
    let overlay = CaptionRenderer::new(canvas, &style)
        .render(&layout, &mut font)
        .unwrap();

    let s = style.stroke_width as i32;
    let first = layout.lines.first().unwrap();
    let last = layout.lines.last().unwrap();
    let top = first.y - s;
    let bottom = last.y + last.height as i32 + s;

    let mut inked = 0;
    for y in 0..overlay.height {
        for x in 0..overlay.width {
            if overlay.pixel(x, y)[3] != 0 {
                inked += 1;
                let y = y as i32;
                assert!(y >= top && y < bottom, "ink at row {y} outside {top}..{bottom}");
                assert!(
                    layout.lines.iter().any(|l| y >= l.y - s && y < l.y + l.height as i32 + s),
                    "ink at row {y} between lines"
                );
            }
        }
    }
    assert!(inked > 0);
}
