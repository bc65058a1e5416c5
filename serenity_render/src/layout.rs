use serde::{Deserialize, Serialize};

/// A pixel position on the prescription template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Where each field lands on the template, plus the text metrics.
///
/// The anchors are baseline positions. They live in the config file so a
/// template redesign only needs new numbers, not a code change. The
/// defaults match the shipped template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionLayout {
    #[serde(default = "default_name_anchor")]
    pub name_anchor: Point,
    #[serde(default = "default_age_anchor")]
    pub age_anchor: Point,
    #[serde(default = "default_response_origin")]
    pub response_origin: Point,
    #[serde(default = "default_line_pitch")]
    pub line_pitch: i32,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default = "default_max_text_width")]
    pub max_text_width: f32,
}

fn default_name_anchor() -> Point {
    Point::new(170, 420)
}

fn default_age_anchor() -> Point {
    Point::new(620, 520)
}

fn default_response_origin() -> Point {
    Point::new(200, 620)
}

fn default_line_pitch() -> i32 {
    25
}

fn default_font_scale() -> f32 {
    22.0
}

fn default_max_text_width() -> f32 {
    500.0
}

impl Default for PrescriptionLayout {
    fn default() -> Self {
        Self {
            name_anchor: default_name_anchor(),
            age_anchor: default_age_anchor(),
            response_origin: default_response_origin(),
            line_pitch: default_line_pitch(),
            font_scale: default_font_scale(),
            max_text_width: default_max_text_width(),
        }
    }
}

impl PrescriptionLayout {
    /// Baseline y for the `index`-th wrapped response line. Lines that run
    /// past the canvas bottom are drawn anyway; the template is tall
    /// enough for any realistic advice block.
    pub fn line_y(&self, index: usize) -> i32 {
        self.response_origin.y + index as i32 * self.line_pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_positions_step_by_pitch() {
        let layout = PrescriptionLayout::default();
        assert_eq!(layout.line_y(0), 620);
        assert_eq!(layout.line_y(1), 645);
        assert_eq!(layout.line_y(4), 720);
    }

    #[test]
    fn defaults_match_shipped_template() {
        let layout = PrescriptionLayout::default();
        assert_eq!(layout.name_anchor, Point::new(170, 420));
        assert_eq!(layout.age_anchor, Point::new(620, 520));
        assert_eq!(layout.response_origin, Point::new(200, 620));
        assert_eq!(layout.line_pitch, 25);
        assert_eq!(layout.max_text_width, 500.0);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let layout: PrescriptionLayout = toml::from_str(
            r#"
            line_pitch = 30
            [response_origin]
            x = 180
            y = 600
            "#,
        )
        .unwrap();
        assert_eq!(layout.line_pitch, 30);
        assert_eq!(layout.response_origin, Point::new(180, 600));
        assert_eq!(layout.name_anchor, Point::new(170, 420));
    }
}
