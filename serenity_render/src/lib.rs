pub use layout::{Point, PrescriptionLayout};
pub use measure::{FontMeasure, TextMeasure};
pub use prescription::{PrescriptionRenderer, RenderError};
pub use wrap::wrap_text;

pub mod layout;
pub mod measure;
pub mod prescription;
pub mod wrap;
