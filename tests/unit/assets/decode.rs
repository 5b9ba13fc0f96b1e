use std::io::Cursor;

use super::*;

fn write_png(path: &Path, w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 4]) {
    let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba(f(x, y)));
    img.save(path).unwrap();
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.canvas(), Canvas { width: 1, height: 1 });
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn missing_background_is_resource_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.png");
    let err = load_background(&path, Canvas { width: 4, height: 4 }).unwrap_err();
    match err {
        ReelError::ResourceNotFound { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn background_is_cropped_to_canvas_keeping_center() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.png");
    // 40x10: red outer quarters, green center half.
    write_png(&path, 40, 10, |x, _| {
        if (10..30).contains(&x) {
            [0, 255, 0, 255]
        } else {
            [255, 0, 0, 255]
        }
    });

    let canvas = Canvas {
        width: 10,
        height: 10,
    };
    let bg = load_background(&path, canvas).unwrap();
    assert_eq!(bg.canvas(), canvas);
    assert_eq!(bg.rgba8_premul.len(), canvas.rgba_len());

    // Height already matches, so the crop keeps x in 15..25 of the source: all green.
    for px in bg.rgba8_premul.chunks_exact(4) {
        assert!(px[1] > 200 && px[0] < 50, "expected green, got {px:?}");
        assert_eq!(px[3], 255);
    }
}

#[test]
fn small_background_is_upscaled_to_cover() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.png");
    write_png(&path, 2, 3, |_, _| [10, 20, 30, 255]);

    let canvas = Canvas {
        width: 16,
        height: 12,
    };
    let bg = load_background(&path, canvas).unwrap();
    assert_eq!(bg.width, 16);
    assert_eq!(bg.height, 12);
    for px in bg.rgba8_premul.chunks_exact(4) {
        for (got, want) in px.iter().zip([10u8, 20, 30, 255]) {
            assert!(got.abs_diff(want) <= 1, "got {px:?}");
        }
    }
}
