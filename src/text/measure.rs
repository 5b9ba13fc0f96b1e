/// Pixel extent of a measured string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextExtent {
    /// Horizontal advance in pixels.
    pub width: u32,
    /// Line box height in pixels.
    pub height: u32,
}

/// Measures strings for one resolved font at one pixel size.
///
/// Implementations take `&mut self` so they can reuse shaping contexts between calls.
pub trait TextMeasurer {
    /// Pixel size the measurer was resolved at.
    fn size_px(&self) -> u32;

    /// Measure `text` as a single unwrapped line.
    fn measure(&mut self, text: &str) -> TextExtent;

    /// Nominal height of one line, reserved for blank spacer lines.
    fn line_height(&mut self) -> u32;
}
