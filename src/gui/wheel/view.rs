use super::model::Caption;
use super::{CAPTION_FONT_SIZE, CENTER_CIRCLE_RATIO, LABEL_FONT_RATIO, TITLE_FONT_SIZE};
use crate::gui::theme::ThemeColors;
use arcwheel::{Scene, SegmentSprite};
use cairo::Context;
use palette::Srgba;
use std::f64::consts::PI;

struct SegmentRenderer<'a> {
    sprite: &'a SegmentSprite,
    ring_width: f64,
    color: Srgba<f64>,
}

impl<'a> SegmentRenderer<'a> {
    fn new(sprite: &'a SegmentSprite, ring_width: f64, color: Srgba<f64>) -> Self {
        Self {
            sprite,
            ring_width,
            color,
        }
    }

    fn draw(&self, cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_arc(cr, scene)?;
        self.draw_knob(cr)?;
        self.draw_label(cr, colors)
    }

    fn draw_arc(&self, cr: &Context, scene: &Scene) -> Result<(), cairo::Error> {
        set_source(cr, self.color);
        cr.set_line_width(self.ring_width);
        cr.set_line_cap(cairo::LineCap::Round);
        cr.new_sub_path();
        // cairo sweeps clockwise on screen, matching the layout's angle direction
        cr.arc(
            scene.center.x,
            scene.center.y,
            scene.radius,
            self.sprite.start_angle,
            self.sprite.start_angle + self.sprite.path.span,
        );
        cr.stroke()
    }

    fn draw_knob(&self, cr: &Context) -> Result<(), cairo::Error> {
        set_source(cr, self.color);
        cr.new_sub_path();
        cr.arc(
            self.sprite.knob.x,
            self.sprite.knob.y,
            self.sprite.knob_radius,
            0.0,
            2.0 * PI,
        );
        cr.fill()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_source(cr, colors.knob_text);
        show_centered(
            cr,
            self.sprite.label.as_str(),
            self.sprite.knob.x,
            self.sprite.knob.y,
            self.sprite.knob_radius * LABEL_FONT_RATIO,
        )
    }
}

pub fn draw(
    cr: &Context,
    scene: &Scene,
    caption: &Caption,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    draw_center(cr, scene, caption, colors)?;

    for (i, sprite) in scene.sprites.iter().enumerate() {
        SegmentRenderer::new(sprite, scene.ring_width, colors.segment(i)).draw(cr, scene, colors)?;
    }
    Ok(())
}

fn draw_center(
    cr: &Context,
    scene: &Scene,
    caption: &Caption,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (x, y) = (scene.center.x, scene.center.y);

    set_source(cr, colors.center_circle);
    cr.new_sub_path();
    cr.arc(x, y, scene.radius * CENTER_CIRCLE_RATIO, 0.0, 2.0 * PI);
    cr.fill()?;

    set_source(cr, colors.caption_subtle);
    show_centered(cr, &caption.title, x, y - CAPTION_FONT_SIZE, TITLE_FONT_SIZE)?;

    set_source(cr, colors.caption);
    show_centered(cr, &caption.value, x, y, CAPTION_FONT_SIZE)?;

    if let Some(detail) = &caption.detail {
        set_source(cr, colors.caption_subtle);
        show_centered(cr, detail, x, y + CAPTION_FONT_SIZE, TITLE_FONT_SIZE)?;
    }
    Ok(())
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn show_centered(cr: &Context, text: &str, x: f64, y: f64, size: f64) -> Result<(), cairo::Error> {
    if text.is_empty() {
        return Ok(());
    }
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(
            x - ext.width() / 2.0 - ext.x_bearing(),
            y - ext.height() / 2.0 - ext.y_bearing(),
        );
        cr.show_text(text)?;
    }
    Ok(())
}
