/// Text rendered for the highlight, already cropped to its box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLabel {
    pub text: String,
    pub width: i32,
}

/// Text measurement and truncation supplied by the renderer.
pub trait LabelRenderer: Send + 'static {
    fn render(&self, text: &str, max_width: i32) -> RenderedLabel;
}

/// Monospace measurer: every character advances the same number of pixels.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvanceLabels {
    advance: i32,
}

impl FixedAdvanceLabels {
    pub fn new(advance: i32) -> Self {
        Self {
            advance: advance.max(1),
        }
    }
}

impl LabelRenderer for FixedAdvanceLabels {
    fn render(&self, text: &str, max_width: i32) -> RenderedLabel {
        let fits = usize::try_from(max_width.max(0) / self.advance).unwrap_or(0);
        let text: String = text.chars().take(fits).collect();
        let width = text.chars().count() as i32 * self.advance;
        RenderedLabel { text, width }
    }
}
