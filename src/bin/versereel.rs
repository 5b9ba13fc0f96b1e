use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "versereel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one caption over a transparent canvas as a PNG.
    Caption(CaptionArgs),
    /// Compose stanzas, narration and backgrounds into an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// JSON configuration file; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Caption font file, overriding the configuration.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Vertical caption anchor: top, center or bottom.
    #[arg(long)]
    anchor: Option<versereel::VerticalAnchor>,

    /// Print which font each caption resolved to.
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct CaptionArgs {
    /// Caption text; use `--text-file` for multi-line captions.
    #[arg(conflicts_with = "text_file", required_unless_present = "text_file")]
    text: Option<String>,

    /// Read the caption text from a file.
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Stanza text file; stanzas are separated by blank lines.
    #[arg(long)]
    stanzas: PathBuf,

    /// Narration files, one per stanza, in order.
    #[arg(long, num_args = 1.., required = true)]
    audio: Vec<PathBuf>,

    /// Background images, one per stanza, in order.
    #[arg(long, num_args = 1.., conflicts_with = "backgrounds_dir")]
    backgrounds: Vec<PathBuf>,

    /// Directory of background images, taken in name order and reused when short.
    #[arg(long, required_unless_present = "backgrounds")]
    backgrounds_dir: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second, overriding the configuration.
    #[arg(long)]
    fps: Option<u32>,

    /// Build stanza clips in parallel.
    #[arg(long)]
    parallel: bool,

    #[command(flatten)]
    style: StyleArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Caption(args) => cmd_caption(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(style: &StyleArgs) -> anyhow::Result<versereel::ReelConfig> {
    let mut config = match style.config.as_deref() {
        Some(path) => versereel::ReelConfig::from_json_file(path)?,
        None => versereel::ReelConfig::default(),
    };
    if let Some(font) = style.font.clone() {
        config.caption.font_path = Some(font);
    }
    if let Some(anchor) = style.anchor {
        config.caption.anchor = anchor;
    }
    Ok(config)
}

fn cmd_caption(args: CaptionArgs) -> anyhow::Result<()> {
    let config = load_config(&args.style)?;
    config.validate()?;
    let canvas = config.canvas()?;

    let text = match (&args.text, &args.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read caption text '{}'", path.display()))?,
        (None, None) => anyhow::bail!("either a caption text or --text-file is required"),
    };

    let (layout, mut font) = versereel::prepare_caption(&text, &config.caption, canvas)?;
    if args.style.dump_fonts {
        dump_font(1, &font, layout.font_size);
    }
    let overlay =
        versereel::CaptionRenderer::new(canvas, &config.caption).render(&layout, &mut font)?;

    write_png(&args.out, &overlay)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.style)?;
    if let Some(fps) = args.fps {
        config.output.fps = fps;
    }
    if args.parallel {
        config.threading.parallel = true;
    }
    config.validate()?;

    let stanzas = versereel::inputs::read_stanza_file(&args.stanzas)?;
    let background_paths = match args.backgrounds_dir.as_deref() {
        Some(dir) => versereel::inputs::select_backgrounds(dir, stanzas.len())?,
        None => args.backgrounds.clone(),
    };

    if args.style.dump_fonts {
        let canvas = config.canvas()?;
        for (i, text) in stanzas.iter().enumerate() {
            let (layout, font) = versereel::prepare_caption(text, &config.caption, canvas)?;
            dump_font(i + 1, &font, layout.font_size);
        }
    }

    let inputs = versereel::CompositionInputs {
        stanzas,
        audio_paths: args.audio,
        background_paths,
    };

    let job = versereel::JobHandle::new();
    let stats = versereel::compose_video(&inputs, &config, &args.out, Some(&job))?;

    eprintln!(
        "wrote {} ({} frames, {:.2}s)",
        args.out.display(),
        stats.frames,
        stats.duration_sec
    );
    Ok(())
}

fn dump_font(stanza: usize, font: &versereel::CaptionFont, size_px: u32) {
    eprintln!("stanza {stanza}:");
    eprintln!("  font:      {}", font.describe());
    eprintln!("  size_px:   {size_px}");
}

fn write_png(path: &Path, overlay: &versereel::CaptionOverlay) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    // PNG stores straight alpha.
    let mut straight = overlay.data.clone();
    for px in straight.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }

    image::save_buffer_with_format(
        path,
        &straight,
        overlay.width,
        overlay.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
