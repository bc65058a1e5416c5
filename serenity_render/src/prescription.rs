use crate::layout::{Point, PrescriptionLayout};
use crate::measure::FontMeasure;
use crate::wrap::wrap_text;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read font file {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font file {path} is not a usable font: {source}")]
    FontParse {
        path: PathBuf,
        #[source]
        source: ab_glyph::InvalidFont,
    },
    #[error("failed to load template image {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write prescription {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Stamps a profile and the accumulated advice text onto the prescription
/// template at the layout's anchor positions.
pub struct PrescriptionRenderer {
    font: FontVec,
    layout: PrescriptionLayout,
}

impl PrescriptionRenderer {
    pub fn from_font_file(path: &Path, layout: PrescriptionLayout) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|source| RenderError::FontParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { font, layout })
    }

    pub fn layout(&self) -> &PrescriptionLayout {
        &self.layout
    }

    /// Draws `name` and `age` at their anchors, wraps `body` to the layout
    /// width and stamps one line per pitch step, then writes the annotated
    /// image to `output_path` and returns it for inline display.
    ///
    /// The template is reloaded from disk on every call, so repeated
    /// generates never compound earlier overlays.
    pub fn render(
        &self,
        name: &str,
        age: u32,
        body: &str,
        template_path: &Path,
        output_path: &Path,
    ) -> Result<RgbImage, RenderError> {
        let mut canvas = image::open(template_path)
            .map_err(|source| RenderError::TemplateLoad {
                path: template_path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        let scale = PxScale::from(self.layout.font_scale);
        // Anchors are baseline positions; draw_text_mut wants the glyph top.
        let ascent = self.font.as_scaled(scale).ascent();

        self.stamp(&mut canvas, name, self.layout.name_anchor, scale, ascent);
        self.stamp(
            &mut canvas,
            &age.to_string(),
            self.layout.age_anchor,
            scale,
            ascent,
        );

        let measure = FontMeasure::new(&self.font, scale);
        let lines = wrap_text(body, &measure, self.layout.max_text_width);
        for (i, line) in lines.iter().enumerate() {
            let anchor = Point::new(self.layout.response_origin.x, self.layout.line_y(i));
            self.stamp(&mut canvas, line, anchor, scale, ascent);
        }

        canvas
            .save(output_path)
            .map_err(|source| RenderError::WriteOutput {
                path: output_path.to_path_buf(),
                source,
            })?;

        Ok(canvas)
    }

    fn stamp(&self, canvas: &mut RgbImage, text: &str, anchor: Point, scale: PxScale, ascent: f32) {
        let top = anchor.y - ascent.round() as i32;
        draw_text_mut(canvas, INK, anchor.x, top, scale, &self.font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn test_renderer() -> PrescriptionRenderer {
        let font = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/assets/DejaVuSans.ttf");
        PrescriptionRenderer::from_font_file(&font, PrescriptionLayout::default()).unwrap()
    }

    #[test]
    fn missing_template_reports_template_load_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let renderer = test_renderer();
        let template = dir.path().join("absent_template.jpg");
        let output = dir.path().join("out.jpeg");

        let err = renderer
            .render("Mr. Silva", 41, "rest well", &template, &output)
            .err()
            .unwrap();

        assert!(matches!(err, RenderError::TemplateLoad { .. }));
        assert!(err.to_string().contains("absent_template.jpg"));
        assert!(!output.exists());
    }

    #[test]
    fn unreadable_template_reports_template_load() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("garbage.jpg");
        fs::write(&template, b"not an image at all").unwrap();
        let output = dir.path().join("out.jpeg");

        let err = test_renderer()
            .render("Miss. Ana", 29, "walk daily", &template, &output)
            .err()
            .unwrap();

        assert!(matches!(err, RenderError::TemplateLoad { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn render_stamps_template_and_writes_the_output_file() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.jpg");
        RgbImage::from_pixel(900, 900, Rgb([255, 255, 255]))
            .save(&template)
            .unwrap();
        let output = dir.path().join("out.jpeg");

        let canvas = test_renderer()
            .render(
                "Mr. Silva",
                41,
                "rest well and drink water every day",
                &template,
                &output,
            )
            .unwrap();

        assert_eq!(canvas.dimensions(), (900, 900));
        assert!(output.exists());
        // Text was actually stamped: the canvas is no longer all white.
        assert!(canvas.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    #[test]
    fn missing_font_file_reports_font_read() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.ttf");
        let err = PrescriptionRenderer::from_font_file(&missing, PrescriptionLayout::default())
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::FontRead { .. }));
        assert!(err.to_string().contains("nope.ttf"));
    }

    #[test]
    fn junk_font_file_reports_font_parse() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        fs::write(&bogus, b"this is not a font").unwrap();
        let err = PrescriptionRenderer::from_font_file(&bogus, PrescriptionLayout::default())
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::FontParse { .. }));
    }
}
