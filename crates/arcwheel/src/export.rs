//! Static SVG rendering of a composed [`Scene`].

use crate::scene::Scene;
use svg::Document;
use svg::node::Text as SvgText;
use svg::node::element::{Circle, Path, Text};

pub const SEGMENT_COLORS: &[&str] = &[
    "#4f7cff", "#2bb673", "#f5a623", "#e94e77", "#9b59b6", "#1abc9c",
];

pub fn segment_color(index: usize) -> &'static str {
    SEGMENT_COLORS[index % SEGMENT_COLORS.len()]
}

pub fn scene_to_svg(scene: &Scene, size: f64, caption: Option<&str>) -> Document {
    let mut document = Document::new()
        .set("viewBox", (0.0, 0.0, size, size))
        .set("width", size)
        .set("height", size)
        .set("xmlns", "http://www.w3.org/2000/svg");

    for (i, sprite) in scene.sprites.iter().enumerate() {
        let color = segment_color(i);

        let ring = Path::new()
            .set("d", sprite.path.to_string())
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", scene.ring_width)
            .set("stroke-linecap", "round");

        let knob = Circle::new()
            .set("cx", sprite.knob.x)
            .set("cy", sprite.knob.y)
            .set("r", sprite.knob_radius)
            .set("fill", color);

        let label = centered_text(sprite.knob.x, sprite.knob.y, sprite.knob_radius * 0.8)
            .set("fill", "#ffffff")
            .add(SvgText::new(sprite.label.to_string()));

        document = document.add(ring).add(knob).add(label);
    }

    if let Some(caption) = caption {
        let text = centered_text(scene.center.x, scene.center.y, 16.0)
            .set("fill", "#222222")
            .add(SvgText::new(caption));
        document = document.add(text);
    }

    document
}

fn centered_text(x: f64, y: f64, font_size: f64) -> Text {
    Text::new("")
        .set("x", x)
        .set("y", y)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "central")
        .set("font-family", "sans-serif")
        .set("font-weight", "bold")
        .set("font-size", font_size)
}
