use ab_glyph::{Font, GlyphId, PxScale, ScaleFont};

/// Answers "how many pixels wide does this string render?" for a fixed
/// font/scale. Wrapping only ever asks this one question, so keeping it
/// behind a trait lets tests substitute a deterministic ruler.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

/// Width oracle over an `ab_glyph` font at a fixed pixel scale.
pub struct FontMeasure<'f, F: Font> {
    font: &'f F,
    scale: PxScale,
}

impl<'f, F: Font> FontMeasure<'f, F> {
    pub fn new(font: &'f F, scale: impl Into<PxScale>) -> Self {
        Self {
            font,
            scale: scale.into(),
        }
    }

    pub fn ascent(&self) -> f32 {
        self.font.as_scaled(self.scale).ascent()
    }
}

impl<F: Font> TextMeasure for FontMeasure<'_, F> {
    fn text_width(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }
}
