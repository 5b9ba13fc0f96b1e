//! Versereel turns poem stanzas into a vertical captioned video.
//!
//! Each stanza becomes one clip: a background image scaled to cover the output canvas, a
//! caption wrapped and outlined on top, and the stanza's narration as the only audio. Clips are
//! concatenated in order and streamed to an encoder.
//!
//! - Lay out and rasterize captions with [`CaptionLayoutEngine`] and [`CaptionRenderer`]
//! - Build clips with [`StanzaClipBuilder`]
//! - Concatenate with [`VideoAssembler`] and encode with [`export`] or [`export_to`]
//! - Or run everything at once with [`compose_video`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod caption;
mod clip;
mod config;
mod foundation;
mod render;
mod text;
mod timeline;

pub mod encode;
pub mod inputs;
pub mod job;
pub mod pipeline;

pub use crate::assets::decode::{PreparedImage, decode_image, load_background};
pub use crate::assets::media::{AudioPcm, MIX_SAMPLE_RATE, decode_audio};
pub use crate::caption::layout::{
    CaptionLayout, CaptionLayoutEngine, EDGE_MARGIN_PX, LayoutLine, MAX_FONT_SIZE_PX,
    MIN_FONT_SIZE_PX, select_font_size, wrap_text,
};
pub use crate::caption::render::{
    CaptionOverlay, CaptionRenderer, prepare_caption, render_caption,
};
pub use crate::clip::builder::StanzaClipBuilder;
pub use crate::clip::stanza::{AudioTrack, StanzaClip};
pub use crate::config::settings::{
    CaptionStyle, ClipThreading, OutputSettings, ReelConfig, VerticalAnchor,
};
pub use crate::foundation::color::Rgb8;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::foundation::probe::{Probe, ProbeAttempt, ProbeExhausted, first_available};
pub use crate::job::{JobHandle, JobStage, JobStatus};
pub use crate::pipeline::{
    CompositionInputs, build_clips, compose_into_sink, compose_video, validate_inputs,
};
pub use crate::render::frame::FrameRGBA;
pub use crate::text::builtin::BuiltinFont;
pub use crate::text::measure::{TextExtent, TextMeasurer};
pub use crate::text::outline::OutlineFont;
pub use crate::text::resolve::{
    CaptionFont, SYSTEM_FONT_CANDIDATES, resolve_font, resolve_font_from,
};
pub use crate::timeline::assemble::{ClipSpan, Timeline, VideoAssembler};
pub use crate::timeline::export::{ExportSettings, ExportStats, export, export_to};
