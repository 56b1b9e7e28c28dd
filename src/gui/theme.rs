use arcwheel::export::SEGMENT_COLORS;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba};
use std::str::FromStr;

pub struct ThemeColors {
    pub segments: Vec<Srgba<f64>>,
    pub knob_text: Srgba<f64>,
    pub center_circle: Srgba<f64>,
    pub caption: Srgba<f64>,
    pub caption_subtle: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            segments: segment_palette(),
            knob_text: Srgba::new(1.0, 1.0, 1.0, 1.0),
            center_circle: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.15, 0.15, 0.15, 0.5),
                Some(0.6),
            ),
            caption: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.9, 0.9, 0.9, 1.0),
                None,
            ),
            caption_subtle: Self::lookup_color(
                context,
                "theme_unfocused_fg_color",
                Srgba::new(0.6, 0.6, 0.6, 0.9),
                Some(0.7),
            ),
        }
    }

    pub fn segment(&self, index: usize) -> Srgba<f64> {
        self.segments
            .get(index % self.segments.len().max(1))
            .copied()
            .unwrap_or(Srgba::new(0.4, 0.4, 0.8, 1.0))
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

/// Segment colours shared with the SVG export, as RGBA.
pub fn segment_palette() -> Vec<Srgba<f64>> {
    SEGMENT_COLORS
        .iter()
        .filter_map(|hex| Srgb::<u8>::from_str(hex).ok())
        .map(|rgb| {
            let c: Srgb<f64> = rgb.into_format();
            Srgba::new(c.red, c.green, c.blue, 1.0)
        })
        .collect()
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.orbit-window, .orbit-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_palette_parses_every_color() {
        let palette = segment_palette();
        assert_eq!(palette.len(), SEGMENT_COLORS.len());

        let first = palette[0];
        assert!((first.red - f64::from(0x4f_u8) / 255.0).abs() < 1e-9);
        assert!((first.blue - 1.0).abs() < 1e-9);
        assert_eq!(first.alpha, 1.0);
    }
}
