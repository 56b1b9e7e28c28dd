pub mod model;
pub mod view;

pub use model::{Caption, FrameClockScheduler, State, format_amount};
pub use view::draw;

pub const CENTER_CIRCLE_RATIO: f64 = 0.55; // relative to the ring radius
pub const LABEL_FONT_RATIO: f64 = 0.7; // knob label size relative to knob radius
pub const CAPTION_FONT_SIZE: f64 = 20.0;
pub const TITLE_FONT_SIZE: f64 = 11.0;
