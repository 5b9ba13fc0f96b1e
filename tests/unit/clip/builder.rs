use std::path::PathBuf;

use super::*;

fn write_wav(path: &Path, seconds: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..(8_000.0 * seconds).round() as u32 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn write_png(path: &Path, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(8, 8, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

fn builder() -> StanzaClipBuilder {
    StanzaClipBuilder::with_parts(
        CaptionStyle {
            font_path: Some(PathBuf::from("/missing/font.ttf")),
            base_font_size: 24,
            max_width_px: 60,
            stroke_width: 1,
            ..CaptionStyle::default()
        },
        Canvas {
            width: 64,
            height: 48,
        },
        Fps::new(10, 1).unwrap(),
    )
}

struct Fixture {
    _dir: tempfile::TempDir,
    audio: PathBuf,
    background: PathBuf,
}

fn fixture(seconds: f64) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("a.wav");
    let background = dir.path().join("bg.png");
    write_wav(&audio, seconds);
    write_png(&background, [0, 0, 255]);
    Fixture {
        _dir: dir,
        audio,
        background,
    }
}

#[test]
fn clip_duration_matches_audio() {
    let f = fixture(4.2);
    let clip = builder().build(0, "A small stanza", &f.audio, &f.background).unwrap();
    assert!((clip.duration_sec() - 4.2).abs() < clip.fps().frame_duration_secs());
    assert_eq!(clip.index(), 0);
    assert_eq!(clip.text(), "A small stanza");
    assert_eq!(clip.audio_path(), f.audio.as_path());
    assert_eq!(clip.canvas(), builder().canvas());
}

#[test]
fn composite_puts_caption_over_background() {
    let f = fixture(1.0);
    let clip = builder().build(1, "HI", &f.audio, &f.background).unwrap();
    let frame = clip.composite().unwrap();

    assert_eq!(frame.width, 64);
    assert_eq!(frame.height, 48);
    assert!(frame.premultiplied);
    // Corners show the background.
    assert_eq!(frame.pixel(0, 0), [0, 0, 255, 255]);
    // Only the white fill carries red; background is blue and the outline black.
    assert!(frame.data.chunks_exact(4).any(|px| px[0] > 200));
    assert!(clip.overlay().covered_pixels() > 0);
}

#[test]
fn missing_audio_names_the_stanza() {
    let f = fixture(1.0);
    let missing = f.audio.with_file_name("gone.wav");
    let err = builder().build(2, "text", &missing, &f.background).unwrap_err();
    match err {
        ReelError::ResourceNotFound { what, path } => {
            assert_eq!(what, "audio for stanza 3");
            assert_eq!(path, missing);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_background_is_resource_not_found() {
    let f = fixture(1.0);
    let missing = f.background.with_file_name("gone.png");
    let err = builder().build(0, "text", &f.audio, &missing).unwrap_err();
    assert!(matches!(err, ReelError::ResourceNotFound { ref what, .. } if what.contains("background")));
}

#[test]
fn blank_text_and_silent_files_are_invalid_input() {
    let f = fixture(1.0);
    let err = builder().build(0, " \n ", &f.audio, &f.background).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(ref m) if m.starts_with("stanza 1:")));

    let empty = fixture(0.0);
    let err = builder().build(4, "x", &empty.audio, &empty.background).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(ref m) if m.starts_with("stanza 5:")));
}

#[test]
fn new_rejects_invalid_config() {
    let mut config = ReelConfig::default();
    config.output.width = 0;
    assert!(StanzaClipBuilder::new(&config).is_err());

    let ok = StanzaClipBuilder::new(&ReelConfig::default()).unwrap();
    assert_eq!(ok.canvas(), Canvas { width: 1080, height: 1920 });
    assert_eq!(ok.fps(), Fps::new(30, 1).unwrap());
}
